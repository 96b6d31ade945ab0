use {
    crate::platform::Generation,
    alloc::vec::Vec,
    gmm_types::ResourceUsage,
};

bitflags::bitflags! {
    /// Hardware features of the SKU that affect layout and cache policy.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SkuFeatures: u32 {
        /// Last level cache shared with CPU.
        const LLC = 0x0001;

        /// Embedded DRAM cache.
        const EDRAM = 0x0002;

        /// Lossless render compression with CCS.
        const E2E_COMPRESSION = 0x0004;

        /// Media memory compression.
        const MEDIA_COMPRESSION = 0x0008;

        /// CCS is addressed through aux translation table as a flat byte array.
        const AUX_TABLE = 0x0010;

        /// CCS lives in reserved physical memory and needs no allocation.
        const FLAT_PHYS_CCS = 0x0020;

        /// Mip-tail slots follow the standard layout for 1D and 2D resources.
        const STANDARD_MIP_TAIL_FORMAT = 0x0040;

        /// Mip-tail slots follow the standard layout for 3D resources.
        const STANDARD_MIP_TAIL_3D = 0x0080;

        /// L4 cache in front of memory.
        const L4_CACHE = 0x0100;
    }
}

bitflags::bitflags! {
    /// Hardware workarounds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WaTable: u32 {
        /// Each plane of compressed planar surface starts at 64KiB boundary
        /// so that aux table maps planes independently.
        const AUX_PLANE_64KB_ALIGN = 0x0001;

        /// Total height of planar surfaces is rounded to even rows
        /// to avoid hang on hardware over-fetch.
        const EVEN_PLANAR_HEIGHT = 0x0002;

        /// Limit MOCS table to entries below reserved indices.
        const RESERVED_MOCS_TAIL = 0x0004;
    }
}

/// Patch applied to one cache policy entry after table construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheOverride {
    pub usage: ResourceUsage,
    pub llc: Option<bool>,
    pub l3: Option<bool>,
    pub age: Option<u8>,
}

/// Configuration for [`Context`]
///
/// [`Context`]: struct.Context.html
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Hardware generation the layouts are computed for.
    pub generation: Generation,

    /// Features present on the SKU.
    pub sku: SkuFeatures,

    /// Workarounds enabled for the stepping.
    pub wa: WaTable,

    /// Overrides applied to cache policy table after it is built.
    /// Typically read from registry or environment by the driver.
    pub cache_overrides: Vec<CacheOverride>,
}

impl Config {
    /// Returns configuration with default SKU features and workarounds of the generation.
    /// Real drivers should fill features from the device information instead,
    /// since they differ between SKUs of one generation.
    pub fn for_generation(generation: Generation) -> Self {
        let sku = match generation {
            Generation::Gen8 => SkuFeatures::LLC | SkuFeatures::EDRAM,
            Generation::Gen9 | Generation::Gen10 => {
                SkuFeatures::LLC | SkuFeatures::E2E_COMPRESSION | SkuFeatures::MEDIA_COMPRESSION
            }
            Generation::Gen11 => {
                SkuFeatures::LLC
                    | SkuFeatures::E2E_COMPRESSION
                    | SkuFeatures::MEDIA_COMPRESSION
                    | SkuFeatures::STANDARD_MIP_TAIL_FORMAT
            }
            Generation::Gen12 => {
                SkuFeatures::LLC
                    | SkuFeatures::E2E_COMPRESSION
                    | SkuFeatures::MEDIA_COMPRESSION
                    | SkuFeatures::AUX_TABLE
                    | SkuFeatures::STANDARD_MIP_TAIL_FORMAT
                    | SkuFeatures::STANDARD_MIP_TAIL_3D
            }
            Generation::XeLpg => {
                SkuFeatures::E2E_COMPRESSION
                    | SkuFeatures::MEDIA_COMPRESSION
                    | SkuFeatures::AUX_TABLE
                    | SkuFeatures::STANDARD_MIP_TAIL_FORMAT
                    | SkuFeatures::STANDARD_MIP_TAIL_3D
                    | SkuFeatures::L4_CACHE
            }
            Generation::Xe2Lpg => {
                SkuFeatures::E2E_COMPRESSION
                    | SkuFeatures::MEDIA_COMPRESSION
                    | SkuFeatures::FLAT_PHYS_CCS
                    | SkuFeatures::STANDARD_MIP_TAIL_FORMAT
                    | SkuFeatures::STANDARD_MIP_TAIL_3D
                    | SkuFeatures::L4_CACHE
            }
            Generation::Xe3pXpc => {
                SkuFeatures::E2E_COMPRESSION
                    | SkuFeatures::FLAT_PHYS_CCS
                    | SkuFeatures::STANDARD_MIP_TAIL_FORMAT
                    | SkuFeatures::STANDARD_MIP_TAIL_3D
            }
        };

        let wa = match generation {
            Generation::Gen12 | Generation::XeLpg => {
                WaTable::AUX_PLANE_64KB_ALIGN | WaTable::EVEN_PLANAR_HEIGHT
            }
            Generation::Xe2Lpg | Generation::Xe3pXpc => WaTable::EVEN_PLANAR_HEIGHT,
            Generation::Gen8 | Generation::Gen9 | Generation::Gen10 | Generation::Gen11 => {
                WaTable::EVEN_PLANAR_HEIGHT | WaTable::RESERVED_MOCS_TAIL
            }
        };

        Config {
            generation,
            sku,
            wa,
            cache_overrides: Vec::new(),
        }
    }

    /// Adds cache policy override.
    pub fn with_cache_override(mut self, cache_override: CacheOverride) -> Self {
        self.cache_overrides.push(cache_override);
        self
    }
}
