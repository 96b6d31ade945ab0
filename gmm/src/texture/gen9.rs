//! Gen9 introduces standard swizzle tilings with packed mip-tails,
//! lays out 3D textures as arrays of depth slices
//! and compresses render targets with 2D CCS.

use {
    super::{
        aux,
        common::{mip_chain_2d, GEN8_OPS},
        SliceLayout, Surface, TextureLayout, TextureOps,
    },
    crate::{div_ceil, error::LayoutError},
};

pub(crate) const GEN9_OPS: TextureOps = TextureOps {
    fill_3d,
    aux: aux::ccs_2d_aux,
    ..GEN8_OPS
};

/// 3D textures share 2D layout.
/// Legacy tilings put each depth slice `qpitch` rows apart,
/// standard tilings group as many slices as the tile is deep.
pub(crate) fn fill_3d(surface: &Surface<'_>) -> Result<TextureLayout, LayoutError> {
    let block = mip_chain_2d(surface)?;

    if surface.tiling().is_standard() {
        let depth = surface.align.d_align;
        let groups = div_ceil(u64::from(surface.desc.depth), u64::from(depth)) as u32;
        surface.finish(block, groups, SliceLayout::TileGroups { depth })
    } else {
        surface.finish(block, surface.desc.depth, SliceLayout::QPitch)
    }
}
