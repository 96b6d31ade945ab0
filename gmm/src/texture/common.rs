//! Routines shared by all generations, starting with Gen8.

use {
    super::{aux, planar, Block, MipOffset, SliceLayout, Surface, TextureLayout, TextureOps},
    crate::{
        div_ceil,
        error::LayoutError,
        mip_tail::{self, Offset3},
        platform::{a, Platform, TexAlign},
        tile::TileDim,
    },
    alloc::{vec, vec::Vec},
    gmm_types::ResourceType,
};

pub(crate) const GEN8_TEX_ALIGN: TexAlign = TexAlign {
    compressed: a(4, 4),
    depth: a(4, 4),
    depth_16bpp_1x_4x_16x: a(8, 4),
    depth_16bpp_2x_8x: a(8, 8),
    separate_stencil: a(8, 8),
    yuv422: a(4, 4),
    hiz: a(16, 8),
    all_other: a(16, 4),
    all_other_bytes: None,
};

pub(crate) const GEN8_OPS: TextureOps = TextureOps {
    tex_align: GEN8_TEX_ALIGN,
    fill_1d,
    fill_2d,
    fill_3d: fill_3d_stacked,
    fill_planar: planar::fill_planar,
    mip_tail_byte_offset: legacy_mip_tail_byte_offset,
    mip_tail_geometry_offset: legacy_mip_tail_geometry_offset,
    aux: aux::mcs_hiz_aux,
};

pub(crate) fn legacy_mip_tail_byte_offset(
    _platform: &Platform,
    dim: TileDim,
    slot: u32,
) -> Result<u64, LayoutError> {
    mip_tail::gen9_byte_offset(dim, slot)
}

pub(crate) fn legacy_mip_tail_geometry_offset(
    _platform: &Platform,
    dim: TileDim,
    class: usize,
    bits_per_element: u32,
    slot: u32,
) -> Result<Offset3, LayoutError> {
    mip_tail::gen9_geometry_offset(dim, class, bits_per_element, slot)
}

/// Replaces block of the first mip-tail level with all tail levels
/// placed inside the tail tile.
fn pack_mip_tail(
    surface: &Surface<'_>,
    mips: &mut Vec<MipOffset>,
    tail_start_lod: u32,
) -> Result<(), LayoutError> {
    let tile = match mips.pop() {
        Some(tile) => tile,
        None => return Err(LayoutError::OutOfRange),
    };

    for lod in tail_start_lod..=surface.desc.max_lod {
        let (geometry, byte_offset) = surface.mip_tail_offset(lod, tail_start_lod)?;
        mips.push(MipOffset {
            x_bytes: tile.x_bytes + u64::from(geometry.x),
            y_rows: tile.y_rows + u64::from(geometry.y),
            z: geometry.z,
            width_bytes: surface.px_to_bytes(surface.mip_width(lod)),
            height_rows: surface.px_to_rows(surface.mip_height(lod)),
            slices_per_row: 1,
            tail_byte_offset: Some(byte_offset),
        });
    }

    Ok(())
}

/// Lays out mip chain of one slice in the classic pyramid:
/// level 1 below level 0, levels 2 and smaller stacked to the right of level 1.
pub(crate) fn mip_chain_2d(surface: &Surface<'_>) -> Result<Block, LayoutError> {
    let max_lod = surface.desc.max_lod;
    let tail_start_lod = surface.mip_tail_start_lod();
    let last = tail_start_lod.unwrap_or(max_lod);

    let mut mips: Vec<MipOffset> = Vec::with_capacity(max_lod as usize + 1);
    let h0 = surface.level_height_rows(0);
    let mut width = surface.level_width_bytes(0);
    let mut h1 = 0;
    let mut lower = 0;

    for lod in 0..=last {
        let w = surface.level_width_bytes(lod);
        let h = surface.level_height_rows(lod);

        let (x, y) = match lod {
            0 => (0, 0),
            1 => {
                h1 = h;
                (0, h0)
            }
            _ => {
                let x = mips[1].width_bytes;
                let y = h0 + lower;
                lower += h;
                width = width.max(x + w);
                (x, y)
            }
        };

        mips.push(MipOffset {
            x_bytes: x,
            y_rows: y,
            z: 0,
            width_bytes: w,
            height_rows: h,
            slices_per_row: 1,
            tail_byte_offset: None,
        });
    }

    if let Some(start) = tail_start_lod {
        pack_mip_tail(surface, &mut mips, start)?;
    }

    Ok(Block {
        width_bytes: width,
        height_rows: h0 + h1.max(lower),
        mips,
        mip_tail_start_lod: tail_start_lod,
    })
}

/// Lays out mip chain of 1D texture, levels are placed left to right.
pub(crate) fn mip_chain_1d(surface: &Surface<'_>) -> Result<Block, LayoutError> {
    let max_lod = surface.desc.max_lod;
    let tail_start_lod = surface.mip_tail_start_lod();
    let last = tail_start_lod.unwrap_or(max_lod);

    let mut mips = Vec::with_capacity(max_lod as usize + 1);
    let mut x = 0;

    for lod in 0..=last {
        let w = surface.level_width_bytes(lod);
        mips.push(MipOffset {
            x_bytes: x,
            y_rows: 0,
            z: 0,
            width_bytes: w,
            height_rows: 1,
            slices_per_row: 1,
            tail_byte_offset: None,
        });
        x += w;
    }

    if let Some(start) = tail_start_lod {
        pack_mip_tail(surface, &mut mips, start)?;
    }

    Ok(Block {
        width_bytes: x,
        height_rows: 1,
        mips,
        mip_tail_start_lod: tail_start_lod,
    })
}

/// Buffers and 1D textures, one row per array slice.
pub(crate) fn fill_1d(surface: &Surface<'_>) -> Result<TextureLayout, LayoutError> {
    if surface.desc.resource_type == ResourceType::Buffer {
        let width_bytes = surface.px_to_bytes(surface.width);
        let block = Block {
            width_bytes,
            height_rows: 1,
            mips: vec![MipOffset {
                width_bytes,
                height_rows: 1,
                slices_per_row: 1,
                ..MipOffset::default()
            }],
            mip_tail_start_lod: None,
        };
        return surface.finish(block, 1, SliceLayout::QPitch);
    }

    let block = mip_chain_1d(surface)?;
    surface.finish(block, surface.array_slices(), SliceLayout::QPitch)
}

/// 2D textures and cubes.
/// Every array slice and cube face holds the whole mip chain, `qpitch` rows apart.
pub(crate) fn fill_2d(surface: &Surface<'_>) -> Result<TextureLayout, LayoutError> {
    let block = mip_chain_2d(surface)?;
    surface.finish(block, surface.array_slices(), SliceLayout::QPitch)
}

/// Legacy 3D layout.
/// Levels are stacked vertically, depth slices of level `n` go `1 << n` per row.
pub(crate) fn fill_3d_stacked(surface: &Surface<'_>) -> Result<TextureLayout, LayoutError> {
    let mut mips = Vec::with_capacity(surface.desc.max_lod as usize + 1);
    let mut width = 0;
    let mut y = 0;

    for lod in 0..=surface.desc.max_lod {
        let w = surface.level_width_bytes(lod);
        let h = surface.level_height_rows(lod);
        let depth = surface.mip_depth(lod);
        let per_row = (1u64 << lod).min(depth);

        mips.push(MipOffset {
            x_bytes: 0,
            y_rows: y,
            z: 0,
            width_bytes: w,
            height_rows: h,
            slices_per_row: per_row as u32,
            tail_byte_offset: None,
        });

        width = width.max(w * per_row);
        y += h * div_ceil(depth, per_row);
    }

    let qpitch = mips[0].height_rows;
    let block = Block {
        width_bytes: width,
        height_rows: y,
        mips,
        mip_tail_start_lod: None,
    };

    let mut layout = surface.finish(block, 1, SliceLayout::Stacked)?;
    layout.qpitch = qpitch;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            config::Config,
            platform::{Generation, Platform},
            texture::compute_layout,
        },
        gmm_types::{Format, ResourceDescriptor, Tiling},
    };

    fn platform(generation: Generation) -> Platform {
        Platform::new(&Config::for_generation(generation))
    }

    #[test]
    fn mip_pyramid_packs_small_levels_right_of_level_one() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::TileY)
            .with_mips(6);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();

        let positions: Vec<_> = layout.mips.iter().map(|m| (m.x_bytes, m.y_rows)).collect();
        assert_eq!(
            positions,
            [
                (0, 0),
                (0, 64),
                (128, 64),
                (128, 80),
                (128, 88),
                (128, 92),
                (128, 96)
            ]
        );
        assert_eq!(layout.qpitch, 100);
        assert_eq!(layout.pitch, 256);
        assert_eq!(layout.height, 128);
        assert_eq!(layout.size, 32 * 1024);
        assert_eq!(layout.mip_tail_start_lod, None);
    }

    #[test]
    fn buffer_pitch_and_size() {
        let layout =
            compute_layout(&platform(Generation::Gen9), &ResourceDescriptor::buffer(100)).unwrap();
        assert_eq!(layout.pitch, 128);
        assert_eq!(layout.height, 1);
        assert_eq!(layout.size, 4096);
        assert_eq!(layout.tiling, Tiling::Linear);
    }

    #[test]
    fn tiled_buffer_is_rejected() {
        let desc = ResourceDescriptor::buffer(100).with_tiling(Tiling::TileY);
        assert!(compute_layout(&platform(Generation::Gen9), &desc).is_err());
    }

    #[test]
    fn texture_1d_levels_go_left_to_right() {
        let desc = ResourceDescriptor::texture_1d(Format::R32Float, 100).with_mips(2);
        let layout = compute_layout(&platform(Generation::Gen9), &desc).unwrap();

        let xs: Vec<_> = layout.mips.iter().map(|m| m.x_bytes).collect();
        assert_eq!(xs, [0, 448, 704]);
        assert_eq!(layout.pitch, 832);
        assert_eq!(layout.size, 4096);
    }

    #[test]
    fn gen8_3d_stacks_slices_per_level() {
        let desc = ResourceDescriptor::texture_3d(Format::R8G8B8A8Unorm, 16, 16, 4)
            .with_tiling(Tiling::TileY)
            .with_mips(2);
        let layout = compute_layout(&platform(Generation::Gen8), &desc).unwrap();

        assert_eq!(layout.pitch, 128);
        assert_eq!(layout.height, 96);
        assert_eq!(layout.size, 3 * 4096);
        assert_eq!(layout.qpitch, 16);

        let slice = layout.position(1, 1).unwrap();
        assert_eq!((slice.x_bytes, slice.y_rows), (64, 64));
        let slice = layout.position(0, 3).unwrap();
        assert_eq!((slice.x_bytes, slice.y_rows), (0, 48));
    }
}
