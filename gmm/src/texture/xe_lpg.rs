use {
    super::{gen12::GEN12_OPS, TextureOps},
    crate::platform::{a, TexAlign},
};

/// Tile4 replaces TileY, horizontal alignment becomes 128 bytes
/// and depth aligns to 8x4.
pub(crate) const XE_LPG_TEX_ALIGN: TexAlign = TexAlign {
    depth: a(8, 4),
    all_other_bytes: Some(128),
    ..super::gen10::GEN10_TEX_ALIGN
};

pub(crate) const XE_LPG_OPS: TextureOps = TextureOps {
    tex_align: XE_LPG_TEX_ALIGN,
    ..GEN12_OPS
};
