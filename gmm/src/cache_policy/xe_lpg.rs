//! XeLpg has L4 cache instead of LLC, selected by the LeCC part of MOCS,
//! and PAT entries selecting memory type and coherency.

use {
    super::{
        base_coherency, base_flags, has_llc,
        mocs::{
            self, element_l3, element_lecc, l3, lecc, MocsEntry, CACHEABILITY_UC,
            CACHEABILITY_WB, CACHEABILITY_WT,
        },
        pat_policies, CacheFlags, CachePolicyElement, CachePolicyOps, Coherency, L3Policy,
        L4Policy, PatEntry,
    },
    crate::{error::CachePolicyError, platform::Platform},
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

pub(crate) const XE_LPG_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage,
    mocs_table,
    pat_table: &XE_LPG_PAT,
    resolve,
};

pub(crate) const XE_LPG_MOCS_DISPLAY: u32 = 14;
pub(crate) const XE_LPG_MOCS_CCS: u32 = 15;

const WB: u8 = CACHEABILITY_WB;
const UC: u8 = CACHEABILITY_UC;

const fn e(index: u32, l4: u8, l3_cached: bool, go_mem: bool) -> MocsEntry {
    let mut entry = MocsEntry {
        index,
        lecc: lecc(l4, Some(3)),
        l3: l3(l3_cached),
        special: false,
    };
    entry.l3.go_mem = go_mem;
    entry
}

const fn special(mut entry: MocsEntry) -> MocsEntry {
    entry.special = true;
    entry
}

pub(crate) const XE_LPG_MOCS: [MocsEntry; 10] = [
    // Error.
    special(e(0, UC, false, false)),
    e(1, WB, true, false),
    e(2, WB, false, false),
    e(3, UC, false, false),
    e(4, WB, false, true),
    e(5, UC, false, true),
    e(6, UC, true, false),
    e(7, CACHEABILITY_WT, true, false),
    special(e(XE_LPG_MOCS_DISPLAY, CACHEABILITY_WT, false, false)),
    special(e(XE_LPG_MOCS_CCS, WB, false, false)),
];

pub(crate) const XE_LPG_PAT_WB: u32 = 0;
pub(crate) const XE_LPG_PAT_WT: u32 = 1;
pub(crate) const XE_LPG_PAT_UC: u32 = 2;
pub(crate) const XE_LPG_PAT_WB_1WAY: u32 = 3;
pub(crate) const XE_LPG_PAT_WB_2WAY: u32 = 4;

const fn pat(index: u32, l4: L4Policy, coherency: Coherency) -> PatEntry {
    PatEntry {
        index,
        l3: match l4 {
            L4Policy::Uncached => L3Policy::Uncached,
            _ => L3Policy::WriteBack,
        },
        l4,
        coherency,
        compressed: false,
    }
}

pub(crate) const XE_LPG_PAT: [PatEntry; 5] = [
    pat(XE_LPG_PAT_WB, L4Policy::WriteBack, Coherency::NonCoherent),
    pat(XE_LPG_PAT_WT, L4Policy::WriteThrough, Coherency::NonCoherent),
    pat(XE_LPG_PAT_UC, L4Policy::Uncached, Coherency::NonCoherent),
    pat(XE_LPG_PAT_WB_1WAY, L4Policy::WriteBack, Coherency::OneWay),
    pat(XE_LPG_PAT_WB_2WAY, L4Policy::WriteBack, Coherency::TwoWay),
];

fn mocs_table(_platform: &Platform) -> Vec<MocsEntry> {
    XE_LPG_MOCS.to_vec()
}

/// `LLC` flag selects L4 cache.
/// Coherent usages make uncached writes observable in memory.
pub(crate) fn usage(platform: &Platform, usage: ResourceUsage) -> CachePolicyElement {
    let mut flags = base_flags(usage);
    if !has_llc(platform) {
        flags.remove(CacheFlags::LLC);
    }

    let coherency = base_coherency(usage);
    if coherency != Coherency::NonCoherent {
        flags.insert(CacheFlags::GO_MEM);
    }

    CachePolicyElement::new(usage, flags).with_coherency(coherency)
}

fn lookup(table: &[MocsEntry], element: &CachePolicyElement) -> Result<u32, CachePolicyError> {
    let lecc = element_lecc(element);
    let l3 = element_l3(element);

    // Lines cached in L3 are observable there.
    mocs::lookup(table, |entry| {
        entry.lecc.cacheability == lecc.cacheability
            && entry.l3.cacheability == l3.cacheability
            && (l3.is_cached() || entry.l3.go_mem == l3.go_mem)
    })
    .ok_or(CachePolicyError::NoMatchingEntry(element.usage))
}

pub(crate) fn pat_index(element: &CachePolicyElement) -> u32 {
    if element.usage.is_displayable() {
        XE_LPG_PAT_WT
    } else if !element.is_cached() {
        XE_LPG_PAT_UC
    } else {
        match element.coherency {
            Coherency::NonCoherent => XE_LPG_PAT_WB,
            Coherency::OneWay => XE_LPG_PAT_WB_1WAY,
            Coherency::TwoWay => XE_LPG_PAT_WB_2WAY,
        }
    }
}

fn resolve(
    platform: &Platform,
    element: &mut CachePolicyElement,
    table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    element.mocs = if element.usage == ResourceUsage::Ccs {
        element.flags.remove(CacheFlags::L3);
        XE_LPG_MOCS_CCS
    } else if element.usage.is_displayable() {
        element.flags.remove(CacheFlags::L3);
        XE_LPG_MOCS_DISPLAY
    } else {
        lookup(table, element)?
    };

    pat_policies(platform, element);
    element.pat = pat_index(element);
    Ok(())
}
