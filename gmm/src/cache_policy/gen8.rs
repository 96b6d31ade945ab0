use {
    super::{
        base_flags, legacy_pat, no_mocs_table,
        mocs::{element_lecc, MocsEntry, CACHEABILITY_PTE},
        CacheFlags, CachePolicyElement, CachePolicyOps,
    },
    crate::{config::SkuFeatures, error::CachePolicyError, platform::Platform},
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

/// Gen8 surface state carries MOCS value itself.
pub(crate) const GEN8_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage,
    mocs_table: no_mocs_table,
    pat_table: &[],
    resolve,
};

/// Target cache value selecting L3 together with LLC and eLLC.
const TARGET_L3_LLC_ELLC: u32 = 3;

/// Cacheability with eLLC following LLC where the SKU has embedded DRAM.
pub(crate) fn usage(platform: &Platform, usage: ResourceUsage) -> CachePolicyElement {
    let mut flags = base_flags(usage);

    if !platform.has(SkuFeatures::LLC) {
        flags.remove(CacheFlags::LLC);
    }
    if flags.contains(CacheFlags::LLC) && platform.has(SkuFeatures::EDRAM) {
        flags.insert(CacheFlags::ELLC);
    }

    CachePolicyElement::new(usage, flags)
}

/// Packs MOCS value:
/// `[1:0]` age, `[4:3]` target cache, `[6:5]` LLC/eLLC cacheability.
pub(crate) fn mocs_value(element: &CachePolicyElement) -> u32 {
    let lecc = element_lecc(element);

    let target = if element.flags.contains(CacheFlags::L3) {
        TARGET_L3_LLC_ELLC
    } else {
        u32::from(lecc.target_cache)
    };

    let cacheability = if element.usage.is_displayable() {
        CACHEABILITY_PTE
    } else {
        lecc.cacheability
    };

    u32::from(element.age & 3) | target << 3 | u32::from(cacheability) << 5
}

fn resolve(
    _platform: &Platform,
    element: &mut CachePolicyElement,
    _table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    element.mocs = mocs_value(element);
    element.pat = legacy_pat(element);
    Ok(())
}
