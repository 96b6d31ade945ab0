use {
    super::{
        common::{legacy_mip_tail_byte_offset, legacy_mip_tail_geometry_offset},
        gen10::GEN10_OPS,
        TextureOps,
    },
    crate::{
        config::SkuFeatures,
        error::LayoutError,
        mip_tail::{self, Offset3},
        platform::Platform,
        tile::TileDim,
    },
};

/// Gen11 switches mip-tails to the standard slot layout
/// where the SKU supports it.
pub(crate) const GEN11_OPS: TextureOps = TextureOps {
    mip_tail_byte_offset,
    mip_tail_geometry_offset,
    ..GEN10_OPS
};

/// Returns `true` if mip-tails of `dim` resources use standard layout.
/// 3D resources need separate support.
fn standard_mip_tail(platform: &Platform, dim: TileDim) -> bool {
    platform.has(SkuFeatures::STANDARD_MIP_TAIL_FORMAT)
        && (dim != TileDim::ThreeD || platform.has(SkuFeatures::STANDARD_MIP_TAIL_3D))
}

pub(crate) fn mip_tail_byte_offset(
    platform: &Platform,
    dim: TileDim,
    slot: u32,
) -> Result<u64, LayoutError> {
    if !standard_mip_tail(platform, dim) {
        return legacy_mip_tail_byte_offset(platform, dim, slot);
    }
    mip_tail::standard_byte_offset(dim, slot)
}

pub(crate) fn mip_tail_geometry_offset(
    platform: &Platform,
    dim: TileDim,
    class: usize,
    bits_per_element: u32,
    slot: u32,
) -> Result<Offset3, LayoutError> {
    if !standard_mip_tail(platform, dim) {
        return legacy_mip_tail_geometry_offset(platform, dim, class, bits_per_element, slot);
    }
    mip_tail::standard_geometry_offset(dim, class, bits_per_element, slot)
}
