use {
    super::{gen9::GEN9_OPS, TextureOps},
    crate::platform::{a, TexAlign},
};

/// Gen10 relaxes vertical alignment of 16bpp depth with 2x and 8x samples.
pub(crate) const GEN10_TEX_ALIGN: TexAlign = TexAlign {
    depth_16bpp_2x_8x: a(8, 4),
    ..super::common::GEN8_TEX_ALIGN
};

pub(crate) const GEN10_OPS: TextureOps = TextureOps {
    tex_align: GEN10_TEX_ALIGN,
    ..GEN9_OPS
};
