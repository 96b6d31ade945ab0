//! Gen12 MOCS table is fixed by the kernel driver.
//! Usages are matched against general entries,
//! CCS and display surfaces use reserved ones.

use {
    super::{
        gen8, legacy_pat,
        mocs::{
            self, element_l3, element_lecc, l3, lecc, MocsEntry, CACHEABILITY_UC,
            CACHEABILITY_WB, CACHEABILITY_WT,
        },
        CacheFlags, CachePolicyElement, CachePolicyOps,
    },
    crate::{error::CachePolicyError, platform::Platform},
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

pub(crate) const GEN12_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage,
    mocs_table,
    pat_table: &[],
    resolve,
};

pub(crate) const GEN12_MOCS_CCS: u32 = 60;
pub(crate) const GEN12_MOCS_DISPLAY: u32 = 61;

const WB: u8 = CACHEABILITY_WB;
const UC: u8 = CACHEABILITY_UC;

const fn e(index: u32, cacheability: u8, age: Option<u8>, l3_cached: bool) -> MocsEntry {
    MocsEntry {
        index,
        lecc: lecc(cacheability, age),
        l3: l3(l3_cached),
        special: false,
    }
}

const fn no_aom(mut entry: MocsEntry) -> MocsEntry {
    entry.lecc.no_aom = true;
    entry
}

const fn self_snoop(mut entry: MocsEntry) -> MocsEntry {
    entry.lecc.self_snoop = true;
    entry
}

const fn hdc_l1(mut entry: MocsEntry) -> MocsEntry {
    entry.l3.hdc_l1 = true;
    entry
}

const fn special(mut entry: MocsEntry) -> MocsEntry {
    entry.special = true;
    entry
}

const AGE: Option<u8> = Some(3);
const AGE_0: Option<u8> = Some(0);
const AGE_KEEP: Option<u8> = None;

pub(crate) const GEN12_MOCS: [MocsEntry; 26] = [
    // Reserved for error and kernel.
    special(e(0, UC, AGE, false)),
    special(e(1, UC, AGE, false)),
    e(2, WB, AGE, true),
    e(3, UC, AGE, true),
    e(4, WB, AGE, false),
    e(5, UC, AGE, false),
    e(6, WB, AGE_0, false),
    e(7, WB, AGE_0, true),
    e(8, WB, AGE_KEEP, false),
    e(9, WB, AGE_KEEP, true),
    no_aom(e(10, WB, AGE, false)),
    no_aom(e(11, WB, AGE, true)),
    no_aom(e(12, WB, AGE_0, false)),
    no_aom(e(13, WB, AGE_0, true)),
    no_aom(e(14, WB, AGE_KEEP, false)),
    no_aom(e(15, WB, AGE_KEEP, true)),
    self_snoop(e(16, WB, AGE, false)),
    self_snoop(e(17, WB, AGE, true)),
    self_snoop(e(18, UC, AGE, false)),
    self_snoop(e(19, UC, AGE, true)),
    hdc_l1(e(48, WB, AGE, true)),
    hdc_l1(e(49, UC, AGE, true)),
    hdc_l1(e(50, WB, AGE, false)),
    hdc_l1(e(51, UC, AGE, false)),
    special(e(GEN12_MOCS_CCS, WB, AGE, false)),
    special(e(GEN12_MOCS_DISPLAY, CACHEABILITY_WT, AGE, false)),
];

fn mocs_table(_platform: &Platform) -> Vec<MocsEntry> {
    GEN12_MOCS.to_vec()
}

/// Scratch and OpenCL buffers go through HDC L1.
fn usage(platform: &Platform, usage: ResourceUsage) -> CachePolicyElement {
    let mut element = gen8::usage(platform, usage);

    match usage {
        ResourceUsage::ScratchSpace | ResourceUsage::OclBuffer => {
            element.flags.insert(CacheFlags::HDC_L1)
        }
        _ => {}
    }

    element
}

/// Finds general entry with cacheability of the element.
/// Ages without entries fall back to default age.
pub(crate) fn lookup(
    table: &[MocsEntry],
    element: &CachePolicyElement,
) -> Result<u32, CachePolicyError> {
    let lecc = element_lecc(element);
    let l3 = element_l3(element);

    let matches = |entry: &MocsEntry, age: Option<u8>| {
        entry.lecc.cacheability == lecc.cacheability
            && entry.lecc.age == age
            && entry.lecc.no_aom == lecc.no_aom
            && entry.lecc.self_snoop == lecc.self_snoop
            && entry.l3 == l3
    };

    let age = match element.age {
        3 => AGE,
        0 => AGE_0,
        _ => AGE_KEEP,
    };

    mocs::lookup(table, |entry| matches(entry, age))
        .or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "No MOCS entry with age {} for {:?}, using default age",
                element.age,
                element.usage
            );

            mocs::lookup(table, |entry| matches(entry, AGE))
        })
        .ok_or(CachePolicyError::NoMatchingEntry(element.usage))
}

fn resolve(
    _platform: &Platform,
    element: &mut CachePolicyElement,
    table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    element.mocs = if element.usage == ResourceUsage::Ccs {
        element.flags.remove(CacheFlags::L3);
        GEN12_MOCS_CCS
    } else if element.usage.is_displayable() {
        element.flags.remove(CacheFlags::L3);
        GEN12_MOCS_DISPLAY
    } else {
        lookup(table, element)?
    };

    element.pat = legacy_pat(element);
    Ok(())
}
