use super::{aux, gen11::GEN11_OPS, planar, TextureOps};

/// Gen12 maps CCS through the aux translation table
/// and aligns planes of compressed planar surfaces to table granules.
pub(crate) const GEN12_OPS: TextureOps = TextureOps {
    fill_planar: planar::fill_planar_aux_aligned,
    aux: aux::linear_ccs_aux,
    ..GEN11_OPS
};
