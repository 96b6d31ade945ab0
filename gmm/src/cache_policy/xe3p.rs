use {
    super::{
        pat_policies, xe2, xe_lpg, CacheFlags, CachePolicyElement, CachePolicyOps, Coherency,
        L3Policy, L4Policy, MocsEntry, PatEntry,
    },
    crate::{error::CachePolicyError, platform::Platform},
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

/// Xe3p has no L4 cache, PAT selects L3 policy, coherency and compression.
pub(crate) const XE3P_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage,
    pat_table: &XE3P_PAT,
    resolve,
    ..xe2::XE2_CACHE_OPS
};

const fn pat(index: u32, l3: L3Policy, coherency: Coherency, compressed: bool) -> PatEntry {
    xe2::pat(index, l3, L4Policy::Uncached, coherency, compressed)
}

pub(crate) const XE3P_PAT: [PatEntry; 11] = [
    pat(0, L3Policy::WriteBack, Coherency::NonCoherent, false),
    pat(1, L3Policy::WriteBack, Coherency::OneWay, false),
    pat(2, L3Policy::WriteBack, Coherency::TwoWay, false),
    pat(3, L3Policy::Uncached, Coherency::NonCoherent, false),
    pat(4, L3Policy::TransientDisplay, Coherency::NonCoherent, false),
    pat(5, L3Policy::Transient, Coherency::NonCoherent, false),
    pat(6, L3Policy::Uncached, Coherency::OneWay, false),
    pat(7, L3Policy::Uncached, Coherency::TwoWay, false),
    pat(8, L3Policy::WriteBack, Coherency::NonCoherent, true),
    pat(9, L3Policy::Uncached, Coherency::NonCoherent, true),
    pat(10, L3Policy::TransientDisplay, Coherency::NonCoherent, true),
];

fn usage(platform: &Platform, usage: ResourceUsage) -> CachePolicyElement {
    let mut element = xe_lpg::usage(platform, usage);
    element.flags.remove(CacheFlags::LLC);
    element
}

fn resolve(
    platform: &Platform,
    element: &mut CachePolicyElement,
    _table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    pat_policies(platform, element);
    element.l4 = L4Policy::Uncached;
    xe2::resolve_pat(&XE3P_PAT, element)?;
    element.mocs = xe2::XE2_MOCS_DEFER_TO_PAT;
    Ok(())
}
