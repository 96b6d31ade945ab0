use {
    super::{
        gen8, legacy_pat,
        mocs::{self, MocsEntry, UNCACHED_ENTRY},
        CachePolicyElement, CachePolicyOps,
    },
    crate::{config::WaTable, error::CachePolicyError, platform::Platform},
    alloc::{vec, vec::Vec},
};

/// Gen9 programs MOCS table per context,
/// entries are allocated as distinct cacheability combinations are met.
pub(crate) const GEN9_CACHE_OPS: CachePolicyOps = CachePolicyOps {
    usage: gen8::usage,
    mocs_table,
    pat_table: &[],
    resolve,
};

/// Number of MOCS entries available for allocation.
pub(crate) const MOCS_TABLE_LIMIT: u32 = 62;

/// Entries at the end of the table reserved by the kernel driver.
pub(crate) const MOCS_RESERVED_TAIL: u32 = 2;

pub(crate) fn mocs_table(_platform: &Platform) -> Vec<MocsEntry> {
    vec![UNCACHED_ENTRY]
}

pub(crate) fn mocs_limit(platform: &Platform) -> u32 {
    if platform.has_wa(WaTable::RESERVED_MOCS_TAIL) {
        MOCS_TABLE_LIMIT - MOCS_RESERVED_TAIL
    } else {
        MOCS_TABLE_LIMIT
    }
}

pub(crate) fn resolve(
    platform: &Platform,
    element: &mut CachePolicyElement,
    table: &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError> {
    element.mocs = mocs::allocate(table, element, mocs_limit(platform))?;
    element.pat = legacy_pat(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            cache_policy::{CacheFlags, CachePolicy},
            config::{CacheOverride, Config},
            platform::Generation,
        },
        gmm_types::ResourceUsage,
    };

    #[test]
    fn entries_are_shared_by_equal_policies() {
        let config = Config::for_generation(Generation::Gen9);
        let policy = CachePolicy::new(&Platform::new(&config), &[]).unwrap();
        let mocs = |usage| policy.policy(usage).unwrap().mocs;

        assert_eq!(mocs(ResourceUsage::Uncached), 0);
        assert_eq!(mocs(ResourceUsage::DummyPage), 0);
        assert_ne!(mocs(ResourceUsage::Texture), 0);
        assert_eq!(mocs(ResourceUsage::Texture), mocs(ResourceUsage::RenderTarget));
        assert_eq!(mocs(ResourceUsage::Staging), mocs(ResourceUsage::BatchBuffer));
        assert_ne!(mocs(ResourceUsage::Staging), mocs(ResourceUsage::Texture));

        let table = policy.mocs_table();
        for (index, entry) in table.iter().enumerate() {
            assert_eq!(entry.index, index as u32);
        }
        for (i, a) in table.iter().enumerate() {
            for b in &table[i + 1..] {
                assert!(a.lecc != b.lecc || a.l3 != b.l3);
            }
        }

        let texture = &table[mocs(ResourceUsage::Texture) as usize];
        assert!(texture.l3.is_cached());
    }

    #[test]
    fn reserved_tail_shrinks_table() {
        let mut config = Config::for_generation(Generation::Gen9);
        assert_eq!(mocs_limit(&Platform::new(&config)), 60);

        config.wa.remove(WaTable::RESERVED_MOCS_TAIL);
        assert_eq!(mocs_limit(&Platform::new(&config)), 62);
    }

    #[test]
    fn overrides_allocate_new_entries() {
        let config = Config::for_generation(Generation::Gen9).with_cache_override(CacheOverride {
            usage: ResourceUsage::Texture,
            llc: None,
            l3: None,
            age: Some(1),
        });
        let policy = CachePolicy::new(&Platform::new(&config), &config.cache_overrides).unwrap();
        let texture = policy.policy(ResourceUsage::Texture).unwrap();
        let rt = policy.policy(ResourceUsage::RenderTarget).unwrap();

        assert_eq!(texture.age, 1);
        assert!(texture.flags.contains(CacheFlags::L3));
        assert_ne!(texture.mocs, rt.mocs);
    }
}
