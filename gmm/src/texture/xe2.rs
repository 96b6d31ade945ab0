use super::{aux, xe_lpg::XE_LPG_OPS, TextureOps};

/// Xe2 keeps CCS in reserved physical memory.
/// Shared by Xe3p.
pub(crate) const XE2_OPS: TextureOps = TextureOps {
    aux: aux::flat_ccs_aux,
    ..XE_LPG_OPS
};
