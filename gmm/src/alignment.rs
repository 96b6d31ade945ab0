//! Alignment unit resolution.
//!
//! Every mip level, array slice and plane of a surface starts at a multiple
//! of the alignment unit. Legacy tilings take it from the generation's
//! `TexAlign` table. Standard swizzle tilings align every level to a whole tile.

use {
    crate::{
        error::LayoutError,
        platform::{Generation, Platform},
        tile::{tile_geometry, TileDim},
    },
    gmm_types::{FormatInfo, FormatKind, Msaa, ResourceDescriptor, ResourceFlags, ResourceType, SamplePattern},
};

/// Alignment of levels of a surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentUnit {
    pub h_align: u32,
    pub v_align: u32,
    pub d_align: u32,
}

/// Pixel multipliers for interleaved multisampling, indexed by log2 of sample count.
/// Samples of a pixel are spread over a block of that many pixels.
const INTERLEAVED_EXPANSION: [(u32, u32); 5] = [(1, 1), (2, 1), (2, 2), (4, 2), (4, 4)];

/// Divisors of standard tile footprint for arrayed multisampling,
/// indexed by log2 of sample count. All samples of a tile live in the same tile.
const ARRAYED_TILE_SHRINK: [(u32, u32); 5] = [(1, 1), (2, 1), (2, 2), (4, 2), (4, 4)];

fn samples_log2(samples: u32) -> Option<usize> {
    match samples {
        1 => Some(0),
        2 => Some(1),
        4 => Some(2),
        8 => Some(3),
        16 => Some(4),
        _ => None,
    }
}

/// Checks that sample count is supported for the resource.
pub(crate) fn validate_msaa(
    platform: &Platform,
    desc: &ResourceDescriptor,
) -> Result<(), LayoutError> {
    let unsupported = LayoutError::UnsupportedMsaa {
        samples: desc.msaa.samples,
        resource_type: desc.resource_type,
    };

    if samples_log2(desc.msaa.samples).is_none() {
        return Err(unsupported);
    }

    if !desc.msaa.is_multisampled() {
        return Ok(());
    }

    if desc.resource_type != ResourceType::Texture2D {
        return Err(unsupported);
    }

    let kind = desc.format.info().kind;
    if matches!(
        kind,
        FormatKind::Compressed | FormatKind::Planar | FormatKind::PackedYuv
    ) {
        return Err(unsupported);
    }

    if desc.msaa.pattern == SamplePattern::Interleaved
        && desc.msaa.samples == 16
        && platform.generation < Generation::Gen9
    {
        return Err(unsupported);
    }

    if desc.max_lod > 0 {
        return Err(LayoutError::InvalidDescriptor(
            "multisampled resource can't have mip levels",
        ));
    }

    Ok(())
}

/// Returns logical extent of an interleaved multisampled surface in pixels.
/// Arrayed surfaces keep their extent and multiply slices instead.
pub(crate) fn expand_interleaved(msaa: Msaa, width: u64, height: u32) -> (u64, u32) {
    if msaa.pattern != SamplePattern::Interleaved {
        return (width, height);
    }

    let (w, h) = samples_log2(msaa.samples)
        .map(|log2| INTERLEAVED_EXPANSION[log2])
        .unwrap_or((1, 1));

    // Pixel pairs are expanded together, odd extents round up to a pair.
    let width = if w > 1 {
        crate::div_ceil(width, 2) * 2 * u64::from(w)
    } else {
        width
    };
    let height = if h > 1 {
        crate::div_ceil(u64::from(height), 2) as u32 * 2 * h
    } else {
        height
    };

    (width, height)
}

/// Alignment for legacy tilings (linear, X, Y, Tile4) from `TexAlign` table.
pub(crate) fn legacy_alignment(
    platform: &Platform,
    desc: &ResourceDescriptor,
    info: &FormatInfo,
) -> AlignmentUnit {
    let tex_align = &platform.tex_align;

    let align = if info.kind == FormatKind::Compressed {
        let compressed = tex_align.compressed;
        crate::platform::Align2 {
            width: crate::align_to(u64::from(compressed.width), u64::from(info.block_width)) as u32,
            height: crate::align_to(u64::from(compressed.height), u64::from(info.block_height))
                as u32,
        }
    } else if desc.flags.contains(ResourceFlags::SEPARATE_STENCIL)
        || info.kind == FormatKind::Stencil
    {
        tex_align.separate_stencil
    } else if desc.flags.contains(ResourceFlags::DEPTH)
        || matches!(info.kind, FormatKind::Depth | FormatKind::DepthStencil)
    {
        if info.bits_per_element == 16 {
            match desc.msaa.samples {
                2 | 8 => tex_align.depth_16bpp_2x_8x,
                _ => tex_align.depth_16bpp_1x_4x_16x,
            }
        } else {
            tex_align.depth
        }
    } else if info.kind == FormatKind::PackedYuv && info.bits_per_element == 16 {
        tex_align.yuv422
    } else {
        let mut align = tex_align.all_other;
        if let Some(bytes) = tex_align.all_other_bytes {
            align.width = (bytes * 8 / info.bits_per_element).max(16).min(128);
        }
        align
    };

    AlignmentUnit {
        h_align: align.width,
        v_align: align.height,
        d_align: 1,
    }
}

/// Alignment for standard swizzle tilings (Yf, Ys, Tile64):
/// every level is aligned to the tile footprint in pixels.
pub(crate) fn standard_alignment(
    desc: &ResourceDescriptor,
    info: &FormatInfo,
) -> Result<AlignmentUnit, LayoutError> {
    let dim = TileDim::of(desc.resource_type);
    let tile = tile_geometry(desc.tiling, dim, info.bits_per_element)?;

    let unit = match dim {
        TileDim::OneD => AlignmentUnit {
            h_align: 64 * info.block_width,
            v_align: 1,
            d_align: 1,
        },
        TileDim::TwoD => {
            let (w, h) = if desc.msaa.pattern == SamplePattern::Arrayed {
                samples_log2(desc.msaa.samples)
                    .map(|log2| ARRAYED_TILE_SHRINK[log2])
                    .unwrap_or((1, 1))
            } else {
                (1, 1)
            };

            AlignmentUnit {
                h_align: tile.width_elements(info.bits_per_element) / w * info.block_width,
                v_align: tile.height_rows / h * info.block_height,
                d_align: 1,
            }
        }
        TileDim::ThreeD => AlignmentUnit {
            h_align: tile.width_elements(info.bits_per_element) * info.block_width,
            v_align: tile.height_rows * info.block_height,
            d_align: tile.depth * info.block_depth,
        },
    };

    Ok(unit)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::Config,
        gmm_types::{Format, Tiling},
    };

    fn platform(generation: Generation) -> Platform {
        Platform::new(&Config::for_generation(generation))
    }

    #[test]
    fn legacy_color_alignment_is_16x4() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64);
        let unit = legacy_alignment(
            &platform(Generation::Gen9),
            &desc,
            &desc.format.info(),
        );
        assert_eq!((unit.h_align, unit.v_align, unit.d_align), (16, 4, 1));
    }

    #[test]
    fn tile4_alignment_is_128_bytes() {
        let xe = platform(Generation::XeLpg);
        let rgba = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64);
        assert_eq!(legacy_alignment(&xe, &rgba, &rgba.format.info()).h_align, 32);

        let r8 = ResourceDescriptor::texture_2d(Format::R8Unorm, 64, 64);
        assert_eq!(legacy_alignment(&xe, &r8, &r8.format.info()).h_align, 128);

        let wide = ResourceDescriptor::texture_2d(Format::R32G32B32A32Float, 64, 64);
        assert_eq!(legacy_alignment(&xe, &wide, &wide.format.info()).h_align, 16);
    }

    #[test]
    fn depth_16bpp_depends_on_samples() {
        let gen9 = platform(Generation::Gen9);
        let d16 = ResourceDescriptor::texture_2d(Format::D16Unorm, 64, 64)
            .with_flags(ResourceFlags::DEPTH);

        let single = legacy_alignment(&gen9, &d16, &d16.format.info());
        assert_eq!((single.h_align, single.v_align), (8, 4));

        let x2 = d16.with_msaa(2, SamplePattern::Interleaved);
        let unit = legacy_alignment(&gen9, &x2, &x2.format.info());
        assert_eq!((unit.h_align, unit.v_align), (8, 8));
    }

    #[test]
    fn compressed_alignment_floors_at_block() {
        let gen9 = platform(Generation::Gen9);
        let astc = ResourceDescriptor::texture_2d(Format::Astc8x8, 64, 64);
        let unit = legacy_alignment(&gen9, &astc, &astc.format.info());
        assert_eq!((unit.h_align, unit.v_align), (8, 8));
    }

    #[test]
    fn standard_alignment_is_tile_footprint() {
        let desc =
            ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 1, 1).with_tiling(Tiling::TileYs);
        let unit = standard_alignment(&desc, &desc.format.info()).unwrap();
        assert_eq!((unit.h_align, unit.v_align), (128, 128));

        let yf = desc.with_tiling(Tiling::TileYf);
        let unit = standard_alignment(&yf, &yf.format.info()).unwrap();
        assert_eq!((unit.h_align, unit.v_align), (32, 32));
    }

    #[test]
    fn arrayed_msaa_shrinks_tile_footprint() {
        let desc = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 64, 64)
            .with_tiling(Tiling::TileYs)
            .with_msaa(8, SamplePattern::Arrayed);
        let unit = standard_alignment(&desc, &desc.format.info()).unwrap();
        assert_eq!((unit.h_align, unit.v_align), (32, 64));
    }

    #[test]
    fn interleaved_msaa_expands_extent() {
        let msaa = Msaa {
            samples: 4,
            pattern: SamplePattern::Interleaved,
        };
        assert_eq!(expand_interleaved(msaa, 5, 3), (12, 8));

        let arrayed = Msaa {
            samples: 4,
            pattern: SamplePattern::Arrayed,
        };
        assert_eq!(expand_interleaved(arrayed, 5, 3), (5, 3));
    }

    #[test]
    fn unsupported_msaa_is_an_error() {
        let gen9 = platform(Generation::Gen9);
        let cube = ResourceDescriptor::cube(Format::R8G8B8A8Unorm, 16)
            .with_msaa(4, SamplePattern::Arrayed);
        assert!(matches!(
            validate_msaa(&gen9, &cube),
            Err(LayoutError::UnsupportedMsaa { samples: 4, .. })
        ));

        let three = ResourceDescriptor::texture_2d(Format::R8G8B8A8Unorm, 16, 16)
            .with_msaa(3, SamplePattern::Arrayed);
        assert!(validate_msaa(&gen9, &three).is_err());

        let gen8 = platform(Generation::Gen8);
        let depth = ResourceDescriptor::texture_2d(Format::D32Float, 16, 16)
            .with_msaa(16, SamplePattern::Interleaved);
        assert!(validate_msaa(&gen8, &depth).is_err());
        assert!(validate_msaa(&gen9, &depth).is_ok());
    }
}
