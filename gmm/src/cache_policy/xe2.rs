//! Xe2 selects caching with PAT index in page tables.
//! MOCS only defers to PAT, and compressed resources use dedicated PAT entries.

use {
    super::{
        mocs::{lecc, MocsEntry, CACHEABILITY_PTE},
        pat_policies, xe_lpg, CachePolicyElement, CachePolicyOps, Coherency, L3Policy, L4Policy,
        PatEntry,
    },
    crate::{error::CachePolicyError, platform::Platform},
    alloc::{vec, vec::Vec},
};

use self::{Coherency::*, L3Policy as L3, L4Policy as L4};

pub(crate) const XE2_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage: xe_lpg::usage,
    mocs_table,
    pat_table: &XE2_PAT,
    resolve,
};

/// MOCS index deferring all caching decisions to PAT.
pub(crate) const XE2_MOCS_DEFER_TO_PAT: u32 = 0;

const XE2_MOCS: MocsEntry = MocsEntry {
    index: XE2_MOCS_DEFER_TO_PAT,
    lecc: lecc(CACHEABILITY_PTE, Some(3)),
    l3: super::mocs::L3Control {
        cacheability: CACHEABILITY_PTE,
        hdc_l1: false,
        go_mem: false,
    },
    special: false,
};

pub(crate) const fn pat(
    index: u32,
    l3: L3Policy,
    l4: L4Policy,
    coherency: Coherency,
    compressed: bool,
) -> PatEntry {
    PatEntry {
        index,
        l3,
        l4,
        coherency,
        compressed,
    }
}

pub(crate) const XE2_PAT: [PatEntry; 15] = [
    pat(0, L3::WriteBack, L4::WriteBack, NonCoherent, false),
    pat(1, L3::WriteBack, L4::WriteBack, OneWay, false),
    pat(2, L3::WriteBack, L4::WriteBack, TwoWay, false),
    pat(3, L3::Uncached, L4::Uncached, NonCoherent, false),
    pat(4, L3::TransientDisplay, L4::WriteThrough, NonCoherent, false),
    pat(5, L3::Uncached, L4::WriteBack, OneWay, false),
    pat(6, L3::Uncached, L4::Uncached, OneWay, false),
    pat(7, L3::Uncached, L4::Uncached, TwoWay, false),
    pat(8, L3::Uncached, L4::WriteBack, NonCoherent, false),
    pat(9, L3::Transient, L4::WriteBack, NonCoherent, false),
    pat(10, L3::WriteBack, L4::Uncached, NonCoherent, false),
    pat(12, L3::Uncached, L4::WriteBack, NonCoherent, true),
    pat(13, L3::WriteBack, L4::WriteBack, NonCoherent, true),
    pat(14, L3::TransientDisplay, L4::WriteThrough, NonCoherent, true),
    pat(15, L3::Uncached, L4::Uncached, NonCoherent, true),
];

fn mocs_table(_platform: &Platform) -> Vec<MocsEntry> {
    vec![XE2_MOCS]
}

fn find(
    table: &[PatEntry],
    l3: L3Policy,
    l4: L4Policy,
    coherency: Coherency,
    compressed: bool,
) -> Option<u32> {
    table
        .iter()
        .find(|entry| {
            entry.l3 == l3
                && entry.l4 == l4
                && entry.coherency == coherency
                && entry.compressed == compressed
        })
        .map(|entry| entry.index)
}

/// Picks PAT entries for the element.
/// Combinations missing in the table fall back to uncached entry with the same coherency.
/// Compression is available only for non-coherent resources.
pub(crate) fn resolve_pat(
    table: &[PatEntry],
    element: &mut CachePolicyElement,
) -> Result<(), CachePolicyError> {
    let (l3, l4, coherency) = (element.l3, element.l4, element.coherency);

    element.pat = match find(table, l3, l4, coherency, false) {
        Some(index) => index,
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "No PAT entry with {:?}/{:?} for {:?}, using uncached",
                l3,
                l4,
                element.usage
            );

            find(table, L3::Uncached, L4::Uncached, coherency, false)
                .ok_or(CachePolicyError::NoMatchingEntry(element.usage))?
        }
    };

    element.pat_compressed = if coherency == NonCoherent {
        find(table, l3, l4, coherency, true)
    } else {
        None
    };

    Ok(())
}

fn resolve(
    platform: &Platform,
    element: &mut CachePolicyElement,
    _table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    pat_policies(platform, element);
    resolve_pat(&XE2_PAT, element)?;
    element.mocs = XE2_MOCS_DEFER_TO_PAT;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{cache_policy::CachePolicy, config::Config, platform::Generation},
        gmm_types::ResourceUsage,
    };

    #[test]
    fn pat_indices() {
        let config = Config::for_generation(Generation::Xe2Lpg);
        let policy = CachePolicy::new(&Platform::new(&config), &[]).unwrap();
        let element = |usage| *policy.policy(usage).unwrap();

        let texture = element(ResourceUsage::Texture);
        assert_eq!((texture.l3, texture.l4), (L3::WriteBack, L4::WriteBack));
        assert_eq!(texture.pat, 0);
        assert_eq!(texture.pat_compressed, Some(13));
        assert_eq!(texture.mocs, XE2_MOCS_DEFER_TO_PAT);

        assert_eq!(element(ResourceUsage::BatchBuffer).pat, 8);
        assert_eq!(element(ResourceUsage::BatchBuffer).pat_compressed, Some(12));
        assert_eq!(element(ResourceUsage::Staging).pat, 5);
        assert_eq!(element(ResourceUsage::Staging).pat_compressed, None);
        assert_eq!(element(ResourceUsage::ShaderResourceLlcBypass).pat, 10);
        assert_eq!(element(ResourceUsage::Uncached).pat, 3);
        assert_eq!(element(ResourceUsage::PrimarySurface).pat, 4);
        assert_eq!(element(ResourceUsage::PrimarySurface).pat_compressed, Some(14));

        // No write-back two-way coherent entry without L3.
        assert_eq!(element(ResourceUsage::StatusPage).pat, 7);

        assert_eq!(policy.mocs_table().len(), 1);
    }
}
