//! Planar YUV and RGB layouts.
//!
//! Every format family places its planes by its own formula,
//! there is no general rule.

use {
    super::{Block, MipOffset, SliceLayout, Surface, TextureLayout},
    crate::{
        align_to,
        config::{SkuFeatures, WaTable},
        div_ceil, gcd,
        error::LayoutError,
    },
    alloc::vec,
    gmm_types::Format,
};

/// Row alignment of IMCx and JPEG planes.
const IMC_PLANE_ROW_ALIGNMENT: u64 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Plane {
    Y,
    U,
    V,
}

/// Placement of planes of a planar surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneLayout {
    pub count: u32,

    /// `(x_bytes, y_rows)` of each plane indexed by [`Plane`].
    /// Two-plane formats share one interleaved chroma plane. Its second component
    /// starts one sample to the right of the first: `V` for NV12 and P0xx, `U` for NV21.
    pub offsets: [(u64, u64); 3],

    /// Heights of planes in rows before alignment.
    pub unaligned_heights: [u64; 3],
}

impl PlaneLayout {
    pub fn offset(&self, plane: Plane) -> (u64, u64) {
        self.offsets[plane as usize]
    }
}

pub(crate) fn fill_planar(surface: &Surface<'_>) -> Result<TextureLayout, LayoutError> {
    planar_layout(surface, 1)
}

/// Planes of compressed surfaces mapped by aux table start at a new table granule,
/// so that each plane's CCS is mapped independently.
pub(crate) fn fill_planar_aux_aligned(
    surface: &Surface<'_>,
) -> Result<TextureLayout, LayoutError> {
    let platform = surface.platform;
    let plane_alignment = if platform.has_wa(WaTable::AUX_PLANE_64KB_ALIGN)
        && platform.has(SkuFeatures::AUX_TABLE)
        && surface.desc.flags.is_compressed()
    {
        platform.aux_table_granularity
    } else {
        1
    };

    planar_layout(surface, plane_alignment)
}

struct Planes {
    count: u32,
    offsets: [(u64, u64); 3],
    unaligned_heights: [u64; 3],
    luma_rows: u64,
    rows: u64,
}

fn planar_layout(
    surface: &Surface<'_>,
    plane_alignment: u64,
) -> Result<TextureLayout, LayoutError> {
    let format = surface.desc.format;
    let width = match format {
        Format::Imc2 | Format::Imc4 => align_to(surface.width, 2),
        _ => surface.width,
    };
    let width_bytes = surface.px_to_bytes(width);
    let pitch = surface.pitch(width_bytes);

    let mut planes = place_planes(surface, pitch)?;

    if plane_alignment > 1 {
        align_planes(&mut planes, pitch, plane_alignment);
    }

    if surface.platform.has_wa(WaTable::EVEN_PLANAR_HEIGHT) {
        planes.rows = align_to(planes.rows, 2);
    }

    let block = Block {
        width_bytes,
        height_rows: planes.rows,
        mips: vec![MipOffset {
            width_bytes,
            height_rows: planes.luma_rows,
            slices_per_row: 1,
            ..MipOffset::default()
        }],
        mip_tail_start_lod: None,
    };

    let mut layout = surface.finish(block, 1, SliceLayout::QPitch)?;
    layout.planes = Some(PlaneLayout {
        count: planes.count,
        offsets: planes.offsets,
        unaligned_heights: planes.unaligned_heights,
    });
    Ok(layout)
}

fn place_planes(surface: &Surface<'_>, pitch: u64) -> Result<Planes, LayoutError> {
    let format = surface.desc.format;
    let width = surface.width;
    let height = surface.height;

    let tile_rows = u64::from(surface.tile.height_rows);
    let tiled = surface.is_tiled();
    let pad = |rows: u64| {
        if tiled {
            align_to(rows, tile_rows)
        } else {
            rows
        }
    };

    let planes = match format {
        Format::Imc1
        | Format::Imc3
        | Format::MfxJpegYuv420
        | Format::MfxJpegYuv422V
        | Format::MfxJpegYuv411R
        | Format::MfxJpegYuv411
        | Format::MfxJpegYuv422H
        | Format::MfxJpegYuv444 => {
            let chroma = match format {
                Format::MfxJpegYuv411R => div_ceil(height, 4),
                Format::MfxJpegYuv411 | Format::MfxJpegYuv422H | Format::MfxJpegYuv444 => height,
                _ => div_ceil(height, 2),
            };

            let luma_rows = pad(align_to(height, IMC_PLANE_ROW_ALIGNMENT));
            let chroma_rows = pad(align_to(chroma, IMC_PLANE_ROW_ALIGNMENT));

            let first = (0, luma_rows);
            let second = (0, luma_rows + chroma_rows);
            let (u, v) = if format == Format::Imc1 {
                (second, first)
            } else {
                (first, second)
            };

            Planes {
                count: 3,
                offsets: [(0, 0), u, v],
                unaligned_heights: [height, chroma, chroma],
                luma_rows,
                rows: luma_rows + 2 * chroma_rows,
            }
        }

        Format::Rgbp | Format::Bgrp => {
            let rows = pad(height);
            Planes {
                count: 3,
                offsets: [(0, 0), (0, rows), (0, 2 * rows)],
                unaligned_heights: [height; 3],
                luma_rows: rows,
                rows: 3 * rows,
            }
        }

        // Chroma planes share rows, each takes half of the pitch.
        Format::Imc2 | Format::Imc4 => {
            let chroma = div_ceil(height, 2);
            let luma_rows = pad(align_to(height, IMC_PLANE_ROW_ALIGNMENT));
            let chroma_rows = pad(align_to(chroma, IMC_PLANE_ROW_ALIGNMENT));

            let left = (0, luma_rows);
            let right = (pitch / 2, luma_rows);
            let (u, v) = if format == Format::Imc2 {
                (right, left)
            } else {
                (left, right)
            };

            Planes {
                count: 3,
                offsets: [(0, 0), u, v],
                unaligned_heights: [height, chroma, chroma],
                luma_rows,
                rows: luma_rows + chroma_rows,
            }
        }

        // Interleaved chroma plane.
        Format::Nv12
        | Format::Nv21
        | Format::P010
        | Format::P012
        | Format::P016
        | Format::Nv11
        | Format::P208
        | Format::P216 => {
            let chroma = match format {
                Format::Nv11 | Format::P208 | Format::P216 => height,
                _ => div_ceil(height, 2),
            };

            let luma_rows = pad(height);
            let chroma_rows = pad(chroma);
            let sample = u64::from(surface.info.bits_per_element / 8);

            let first = (0, luma_rows);
            let second = (sample, luma_rows);
            let (u, v) = if format == Format::Nv21 {
                (second, first)
            } else {
                (first, second)
            };

            Planes {
                count: 2,
                offsets: [(0, 0), u, v],
                unaligned_heights: [height, chroma, chroma],
                luma_rows,
                rows: luma_rows + chroma_rows,
            }
        }

        // Chroma planes are linear arrays following luma plane, ignoring pitch.
        Format::I420 | Format::Iyuv | Format::Yv12 | Format::Yvu9 => {
            let (align, shift) = if format == Format::Yvu9 {
                (4, 4)
            } else {
                (2, 2)
            };

            let luma_size = pitch * height;
            let chroma_size = (align_to(width, align) * align_to(height, align)) >> shift;

            let at = |offset: u64| (offset % pitch, offset / pitch);
            let first = at(luma_size);
            let second = at(luma_size + chroma_size);
            let (u, v) = if matches!(format, Format::Yv12 | Format::Yvu9) {
                (second, first)
            } else {
                (first, second)
            };

            let chroma_height = height >> (shift / 2);
            Planes {
                count: 3,
                offsets: [(0, 0), u, v],
                unaligned_heights: [height, chroma_height, chroma_height],
                luma_rows: height,
                rows: div_ceil(luma_size + 2 * chroma_size, pitch),
            }
        }

        _ => return Err(LayoutError::UnsupportedFormat(format)),
    };

    Ok(planes)
}

/// Moves chroma planes down so each starts at a multiple of `alignment` bytes.
fn align_planes(planes: &mut Planes, pitch: u64, alignment: u64) {
    let row_step = alignment / gcd(pitch, alignment);

    let mut order = [1usize, 2];
    order.sort_by_key(|&index| planes.offsets[index]);

    // Planes sharing rows move together.
    let mut shift = 0;
    let mut last_row = None;
    for &index in &order {
        let (x, y) = planes.offsets[index];
        if last_row != Some(y) {
            shift = align_to(y + shift, row_step) - y;
            last_row = Some(y);
        }
        planes.offsets[index] = (x, y + shift);
    }

    planes.rows += shift;
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::Config,
            platform::{Generation, Platform},
            texture::compute_layout,
        },
        gmm_types::{ResourceDescriptor, ResourceFlags, Tiling},
    };

    fn platform(generation: Generation) -> Platform {
        Platform::new(&Config::for_generation(generation))
    }

    #[test]
    fn nv12_chroma_follows_aligned_luma() {
        let desc = ResourceDescriptor::texture_2d(Format::Nv12, 0x100, 0x50)
            .with_tiling(Tiling::TileY);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();
        let planes = layout.planes.unwrap();

        assert_eq!(planes.count, 2);
        assert_eq!(planes.offset(Plane::U), (0, 96));
        assert_eq!(planes.offset(Plane::V), (1, 96));
        assert_eq!(planes.unaligned_heights[1], 40);
        assert_eq!(layout.pitch, 256);
        assert_eq!(layout.height, 160);
        assert_eq!(layout.size, 256 * 160);
    }

    #[test]
    fn nv21_swaps_chroma() {
        let desc = ResourceDescriptor::texture_2d(Format::Nv21, 64, 64).with_tiling(Tiling::TileY);
        let planes = compute_layout(&platform(Generation::Gen9), &desc)
            .unwrap()
            .planes
            .unwrap();
        assert_eq!(planes.offset(Plane::V), (0, 64));
        assert_eq!(planes.offset(Plane::U), (1, 64));
    }

    #[test]
    fn imc1_and_imc3_are_mirrored() {
        let imc3 = ResourceDescriptor::texture_2d(Format::Imc3, 64, 40).with_tiling(Tiling::Linear);
        let layout = compute_layout(&platform(Generation::Gen9), &imc3).unwrap();
        let planes = layout.planes.unwrap();
        assert_eq!(planes.offset(Plane::U), (0, 48));
        assert_eq!(planes.offset(Plane::V), (0, 80));
        assert_eq!(layout.height, 112);

        let imc1 = ResourceDescriptor {
            format: Format::Imc1,
            ..imc3
        };
        let planes = compute_layout(&platform(Generation::Gen9), &imc1)
            .unwrap()
            .planes
            .unwrap();
        assert_eq!(planes.offset(Plane::U), (0, 80));
        assert_eq!(planes.offset(Plane::V), (0, 48));
    }

    #[test]
    fn imc4_chroma_shares_rows() {
        let desc = ResourceDescriptor::texture_2d(Format::Imc4, 64, 32).with_tiling(Tiling::Linear);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();
        let planes = layout.planes.unwrap();
        assert_eq!(planes.offset(Plane::U), (0, 32));
        assert_eq!(planes.offset(Plane::V), (32, 32));
        assert_eq!(layout.height, 48);
    }

    #[test]
    fn yv12_chroma_is_packed_after_luma() {
        let desc = ResourceDescriptor::texture_2d(Format::Yv12, 100, 50);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();
        let planes = layout.planes.unwrap();

        assert_eq!(layout.tiling, Tiling::Linear);
        assert_eq!(layout.pitch, 128);
        assert_eq!(planes.offset(Plane::V), (0, 50));
        assert_eq!(planes.offset(Plane::U), (98, 59));
        assert_eq!(layout.height, 70);
        assert_eq!(layout.size, 12288);
    }

    #[test]
    fn yv12_cannot_be_tiled() {
        let desc = ResourceDescriptor::texture_2d(Format::Yv12, 100, 50).with_tiling(Tiling::TileY);
        assert!(compute_layout(&platform(Generation::Gen9), &desc).is_err());
    }

    #[test]
    fn planar_rejects_mips() {
        let desc = ResourceDescriptor::texture_2d(Format::Nv12, 64, 64).with_mips(1);
        assert!(compute_layout(&platform(Generation::Gen9), &desc).is_err());
    }

    #[test]
    fn gen12_compressed_planes_start_at_64kb() {
        let desc = ResourceDescriptor::texture_2d(Format::Nv12, 0x100, 0x50)
            .with_tiling(Tiling::TileY)
            .with_flags(ResourceFlags::MEDIA_COMPRESSED);
        let layout = compute_layout(&platform(Generation::Gen12), &desc).unwrap();
        let planes = layout.planes.unwrap();

        let (_, uv_rows) = planes.offset(Plane::U);
        assert_eq!(uv_rows * layout.pitch % (64 * 1024), 0);
        assert_eq!(uv_rows, 256);
        assert_eq!(layout.size, 128 * 1024);

        let aux = layout.aux.unwrap();
        assert_eq!(aux.plane_offsets, [0, 4096]);
        assert_eq!(aux.size, 8192);
    }
}
