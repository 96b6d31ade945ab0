//! Cache policy resolver.
//!
//! Every generation describes cacheability of each [`ResourceUsage`]
//! and resolves it to indices hardware understands:
//! MOCS value or index for surface state and PAT index for page tables.

mod gen11;
mod gen12;
mod gen8;
mod gen9;
mod mocs;
mod xe2;
mod xe3p;
mod xe_lpg;

pub use self::mocs::{L3Control, LeCcControl, MocsEntry};

use {
    crate::{
        config::{CacheOverride, SkuFeatures},
        error::CachePolicyError,
        platform::{Generation, Platform},
    },
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

bitflags::bitflags! {
    /// Cacheability requested for a usage.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CacheFlags: u32 {
        /// Cached in last level cache.
        /// On generations without LLC this selects L4 caching.
        const LLC = 0x0001;

        /// Cached in embedded DRAM.
        const ELLC = 0x0002;

        const L3 = 0x0004;

        /// Write-through instead of write-back.
        const WT = 0x0008;

        /// Cached in HDC L1 of data port.
        const HDC_L1 = 0x0010;

        /// Do not allocate cache line on miss.
        const NO_AOM = 0x0020;

        /// Self snoop override.
        const SSO = 0x0040;

        /// Writes are globally observable only when they reach memory.
        const GO_MEM = 0x0080;

        /// L3 lines are transient and flushed at the end of the workload.
        const TRANSIENT = 0x0100;
    }
}

/// L3 caching mode of a PAT entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L3Policy {
    WriteBack,

    /// Write-back with lines evicted for display.
    TransientDisplay,

    Transient,
    Uncached,
}

/// L4 caching mode of a PAT entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L4Policy {
    WriteBack,
    WriteThrough,
    Uncached,
}

/// Coherency of GPU accesses with CPU caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Coherency {
    NonCoherent,

    /// GPU snoops CPU caches.
    OneWay,

    /// GPU and CPU snoop each other.
    TwoWay,
}

/// Entry of the page attribute table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatEntry {
    pub index: u32,
    pub l3: L3Policy,
    pub l4: L4Policy,
    pub coherency: Coherency,
    pub compressed: bool,
}

/// Resolved cache policy of one usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CachePolicyElement {
    pub usage: ResourceUsage,
    pub flags: CacheFlags,

    /// LRU age, 3 is the default.
    pub age: u8,

    pub l3: L3Policy,
    pub l4: L4Policy,
    pub coherency: Coherency,

    /// MOCS value on Gen8, index of MOCS table entry on later generations.
    pub mocs: u32,

    /// PAT index for page table entries.
    pub pat: u32,

    /// PAT index for compressed resources where PAT selects compression.
    pub pat_compressed: Option<u32>,

    pub initialized: bool,
}

impl CachePolicyElement {
    pub(crate) fn new(usage: ResourceUsage, flags: CacheFlags) -> Self {
        CachePolicyElement {
            usage,
            flags,
            age: 3,
            l3: L3Policy::Uncached,
            l4: L4Policy::Uncached,
            coherency: Coherency::NonCoherent,
            mocs: 0,
            pat: 0,
            pat_compressed: None,
            initialized: false,
        }
    }

    pub(crate) fn with_coherency(mut self, coherency: Coherency) -> Self {
        self.coherency = coherency;
        self
    }

    #[inline]
    pub fn is_cached(&self) -> bool {
        self.flags
            .intersects(CacheFlags::LLC | CacheFlags::ELLC | CacheFlags::L3)
    }

    fn apply(&mut self, cache_override: &CacheOverride) {
        if let Some(llc) = cache_override.llc {
            self.flags.set(CacheFlags::LLC, llc);
        }
        if let Some(l3) = cache_override.l3 {
            self.flags.set(CacheFlags::L3, l3);
        }
        if let Some(age) = cache_override.age {
            self.age = age.min(3);
        }
    }
}

/// Values programmed into surface state and page tables for a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryObject {
    pub mocs: u32,
    pub pat: u32,
}

// Fixed PTE PAT programming of generations before XeLpg.
pub(crate) const LEGACY_PAT_WB: u32 = 0;
pub(crate) const LEGACY_PAT_WC: u32 = 1;
pub(crate) const LEGACY_PAT_WT: u32 = 2;
pub(crate) const LEGACY_PAT_UC: u32 = 3;

pub(crate) type ResolveFn = fn(
    &Platform,
    &mut CachePolicyElement,
    &mut Vec<MocsEntry>,
) -> Result<(), CachePolicyError>;

/// Cache policy routines of a generation.
pub(crate) struct CachePolicyOps {
    /// Cacheability of the usage.
    pub usage: fn(&Platform, ResourceUsage) -> CachePolicyElement,

    /// MOCS table before any usage is resolved.
    pub mocs_table: fn(&Platform) -> Vec<MocsEntry>,

    pub pat_table: &'static [PatEntry],

    /// Assigns MOCS and PAT indices to the element.
    pub resolve: ResolveFn,
}

pub(crate) fn ops(generation: Generation) -> &'static CachePolicyOps {
    match generation {
        Generation::Gen8 => &gen8::GEN8_CACHE_OPS,
        Generation::Gen9 | Generation::Gen10 => &gen9::GEN9_CACHE_OPS,
        Generation::Gen11 => &gen11::GEN11_CACHE_OPS,
        Generation::Gen12 => &gen12::GEN12_CACHE_OPS,
        Generation::XeLpg => &xe_lpg::XE_LPG_CACHE_OPS,
        Generation::Xe2Lpg => &xe2::XE2_CACHE_OPS,
        Generation::Xe3pXpc => &xe3p::XE3P_CACHE_OPS,
    }
}

pub(crate) fn no_mocs_table(_platform: &Platform) -> Vec<MocsEntry> {
    Vec::new()
}

/// Cacheability shared by all generations,
/// which adjust it for their caches.
pub(crate) fn base_flags(usage: ResourceUsage) -> CacheFlags {
    use ResourceUsage::*;

    let llc = CacheFlags::LLC;
    let l3 = CacheFlags::L3;

    match usage {
        Unknown => llc | l3,

        BatchBuffer | ContextSwitchBuffer | HwContext | GfxRing | StatusPage | KmdStagingSurface
        | AuxTable => llc,
        DummyPage | Uncached => CacheFlags::empty(),
        Cursor | PrimarySurface | ShadowSurface => CacheFlags::WT,

        Buffer | VertexBuffer | IndexBuffer | ConstantBuffer => llc | l3,
        StreamOutputBuffer => llc,
        RenderTarget | DepthBuffer | StencilBuffer | HiZ | Mcs => llc | l3,
        Ccs => llc,
        Texture | ShaderResource => llc | l3,
        ShaderResourceLlcBypass => l3,
        SurfaceState | DynamicState | InstructionHeap | ScratchSpace => llc | l3,
        Staging => llc,

        OclBuffer | OclImage => llc | l3,
        OclSystemMemoryBuffer => llc,

        MfxBitstream | MfxDecodeOutput | MfxEncodeReference | MfxStreamOut | VpInputPicture
        | VpOutputPicture | MediaCompressionState => llc,
    }
}

/// Coherency with CPU shared by generations with coherent PAT entries.
pub(crate) fn base_coherency(usage: ResourceUsage) -> Coherency {
    match usage {
        ResourceUsage::StatusPage | ResourceUsage::OclSystemMemoryBuffer => Coherency::TwoWay,
        ResourceUsage::Staging | ResourceUsage::KmdStagingSurface => Coherency::OneWay,
        _ => Coherency::NonCoherent,
    }
}

/// Returns `true` if the SKU has cache selected by `LLC` flag.
pub(crate) fn has_llc(platform: &Platform) -> bool {
    if platform.generation >= Generation::XeLpg {
        platform.has(SkuFeatures::L4_CACHE)
    } else {
        platform.has(SkuFeatures::LLC)
    }
}

/// Fills PAT policies from cache flags.
pub(crate) fn pat_policies(platform: &Platform, element: &mut CachePolicyElement) {
    element.l3 = if element.usage.is_displayable() {
        L3Policy::TransientDisplay
    } else if !element.flags.contains(CacheFlags::L3) {
        L3Policy::Uncached
    } else if element.flags.contains(CacheFlags::TRANSIENT) {
        L3Policy::Transient
    } else {
        L3Policy::WriteBack
    };

    element.l4 = if !has_llc(platform) {
        L4Policy::Uncached
    } else if element.flags.contains(CacheFlags::WT) {
        L4Policy::WriteThrough
    } else if element.flags.contains(CacheFlags::LLC) {
        L4Policy::WriteBack
    } else {
        L4Policy::Uncached
    };
}

/// Fixed PTE PAT index of generations before XeLpg.
pub(crate) fn legacy_pat(element: &CachePolicyElement) -> u32 {
    if element.usage.is_displayable() {
        LEGACY_PAT_WC
    } else if !element
        .flags
        .intersects(CacheFlags::LLC | CacheFlags::ELLC)
    {
        LEGACY_PAT_UC
    } else if element.flags.contains(CacheFlags::WT) {
        LEGACY_PAT_WT
    } else {
        LEGACY_PAT_WB
    }
}

/// Cache policy table of a platform.
/// Built once per context and immutable afterwards.
#[derive(Clone, Debug)]
pub struct CachePolicy {
    generation: Generation,
    elements: Vec<CachePolicyElement>,
    mocs_table: Vec<MocsEntry>,
    pat_table: &'static [PatEntry],
}

impl CachePolicy {
    /// Builds cache policy of every usage for the platform.
    /// `overrides` patch elements before indices are resolved.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(platform, overrides)))]
    pub fn new(
        platform: &Platform,
        overrides: &[CacheOverride],
    ) -> Result<Self, CachePolicyError> {
        let ops = ops(platform.generation);
        let mut mocs_table = (ops.mocs_table)(platform);

        let mut elements: Vec<_> = ResourceUsage::ALL
            .iter()
            .map(|&usage| (ops.usage)(platform, usage))
            .collect();

        for cache_override in overrides {
            #[cfg(feature = "tracing")]
            tracing::debug!("Cache policy override {:?}", cache_override);

            elements[cache_override.usage.index()].apply(cache_override);
        }

        for element in &mut elements {
            if let Err(err) = (ops.resolve)(platform, element, &mut mocs_table) {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to resolve cache policy: {}", err);

                return Err(err);
            }
            element.initialized = true;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Cache policy for {:?} uses {} MOCS entries",
            platform.generation,
            mocs_table.len()
        );

        Ok(CachePolicy {
            generation: platform.generation,
            elements,
            mocs_table,
            pat_table: ops.pat_table,
        })
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns cache policy of the usage.
    pub fn policy(&self, usage: ResourceUsage) -> Result<&CachePolicyElement, CachePolicyError> {
        match self.elements.get(usage.index()) {
            Some(element) if element.initialized => Ok(element),
            _ => Err(CachePolicyError::Uninitialized(usage)),
        }
    }

    /// Returns MOCS and PAT values for a resource.
    /// `override_usage` replaces usage of the resource when set.
    pub fn memory_object(
        &self,
        resource_usage: ResourceUsage,
        override_usage: Option<ResourceUsage>,
    ) -> Result<MemoryObject, CachePolicyError> {
        let element = self.policy(override_usage.unwrap_or(resource_usage))?;
        Ok(MemoryObject {
            mocs: element.mocs,
            pat: element.pat,
        })
    }

    /// Returns PAT index for page table entries mapping resources of the usage.
    pub fn pte_pat_index(&self, usage: ResourceUsage) -> Result<u32, CachePolicyError> {
        Ok(self.policy(usage)?.pat)
    }

    /// Returns MOCS table the kernel driver programs into hardware.
    /// Empty on generations where MOCS is a value rather than an index.
    pub fn mocs_table(&self) -> &[MocsEntry] {
        &self.mocs_table
    }

    /// Returns page attribute table of the generation.
    /// Empty on generations with fixed PTE PAT programming.
    pub fn pat_table(&self) -> &'static [PatEntry] {
        self.pat_table
    }

    pub fn elements(&self) -> &[CachePolicyElement] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::config::Config};

    fn policy(generation: Generation) -> CachePolicy {
        let config = Config::for_generation(generation);
        CachePolicy::new(&Platform::new(&config), &config.cache_overrides).unwrap()
    }

    #[test]
    fn every_usage_is_initialized() {
        for &generation in Generation::ALL.iter() {
            let policy = policy(generation);
            for &usage in ResourceUsage::ALL.iter() {
                let element = policy.policy(usage).unwrap();
                assert!(element.initialized);
                assert_eq!(element.usage, usage);
            }
        }
    }

    #[test]
    fn construction_is_deterministic() {
        for &generation in Generation::ALL.iter() {
            assert_eq!(policy(generation).elements, policy(generation).elements);
        }
    }

    #[test]
    fn override_replaces_usage() {
        let policy = policy(Generation::Gen12);
        let texture = policy.memory_object(ResourceUsage::Texture, None).unwrap();
        let overridden = policy
            .memory_object(ResourceUsage::Texture, Some(ResourceUsage::Uncached))
            .unwrap();

        assert_eq!(texture.mocs, 2);
        assert_eq!(overridden.mocs, 5);
        assert_eq!(overridden.pat, LEGACY_PAT_UC);
    }

    #[test]
    fn cache_override_patches_before_resolution() {
        let config = Config::for_generation(Generation::Gen12).with_cache_override(CacheOverride {
            usage: ResourceUsage::Texture,
            llc: None,
            l3: Some(false),
            age: None,
        });
        let policy = CachePolicy::new(&Platform::new(&config), &config.cache_overrides).unwrap();
        let texture = policy.policy(ResourceUsage::Texture).unwrap();

        assert!(!texture.flags.contains(CacheFlags::L3));
        assert_eq!(texture.mocs, 4);
    }

    #[test]
    fn legacy_pte_pat() {
        let policy = policy(Generation::Gen9);
        let pat = |usage| policy.pte_pat_index(usage).unwrap();

        assert_eq!(pat(ResourceUsage::Texture), LEGACY_PAT_WB);
        assert_eq!(pat(ResourceUsage::PrimarySurface), LEGACY_PAT_WC);
        assert_eq!(pat(ResourceUsage::Uncached), LEGACY_PAT_UC);
        assert_eq!(pat(ResourceUsage::ShaderResourceLlcBypass), LEGACY_PAT_UC);
    }
}
