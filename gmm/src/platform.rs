use {
    crate::config::{Config, SkuFeatures, WaTable},
    gmm_types::Tiling,
};

/// Hardware generation.
/// Ordered from oldest to newest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Generation {
    Gen8,
    Gen9,
    Gen10,
    Gen11,
    Gen12,
    XeLpg,
    Xe2Lpg,
    Xe3pXpc,
}

impl Generation {
    pub const ALL: [Generation; 8] = [
        Generation::Gen8,
        Generation::Gen9,
        Generation::Gen10,
        Generation::Gen11,
        Generation::Gen12,
        Generation::XeLpg,
        Generation::Xe2Lpg,
        Generation::Xe3pXpc,
    ];
}

/// Alignment in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Align2 {
    pub width: u32,
    pub height: u32,
}

pub(crate) const fn a(width: u32, height: u32) -> Align2 {
    Align2 { width, height }
}

/// Alignment requirements for legacy (non standard-swizzle) tilings.
/// Each generation's table lives with its texture calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TexAlign {
    pub compressed: Align2,
    pub depth: Align2,
    pub depth_16bpp_1x_4x_16x: Align2,
    pub depth_16bpp_2x_8x: Align2,
    pub separate_stencil: Align2,
    pub yuv422: Align2,
    pub hiz: Align2,
    pub all_other: Align2,

    /// When set, `all_other` width is replaced by this many bytes
    /// expressed in pixels of the format.
    pub all_other_bytes: Option<u32>,
}

/// Static description of a generation, selected once at context creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Platform {
    pub generation: Generation,
    pub sku: SkuFeatures,
    pub wa: WaTable,
    pub tex_align: TexAlign,

    /// Largest allocation a single surface may take.
    pub surface_max_size: u64,

    pub max_width: u64,
    pub max_height: u32,
    pub max_depth: u32,
    pub max_array_size: u32,
    pub max_buffer_size: u64,

    /// Pitch alignment in bytes of linear 2D surfaces.
    pub linear_pitch_alignment: u64,

    /// Pitch alignment in bytes of buffers.
    pub buffer_pitch_alignment: u64,

    /// Number of main surface bytes covered by one CCS byte.
    pub ccs_ratio: u64,

    /// Granularity in bytes of aux translation table mapping.
    pub aux_table_granularity: u64,
}

pub(crate) const PAGE_SIZE: u64 = 4 * 1024;
pub(crate) const KB: u64 = 1024;
pub(crate) const GB: u64 = 1024 * 1024 * 1024;

impl Platform {
    pub fn new(config: &Config) -> Self {
        let generation = config.generation;

        let tex_align = crate::texture::ops(generation).tex_align;

        let surface_max_size = match generation {
            Generation::Gen8 => 2 * GB,
            Generation::Gen9 | Generation::Gen10 | Generation::Gen11 => 256 * GB,
            Generation::Gen12 | Generation::XeLpg | Generation::Xe2Lpg => 1024 * GB,
            Generation::Xe3pXpc => 4 * 1024 * GB,
        };

        Platform {
            generation,
            sku: config.sku,
            wa: config.wa,
            tex_align,
            surface_max_size,
            max_width: 16 * 1024,
            max_height: 16 * 1024,
            max_depth: 2048,
            max_array_size: 2048,
            max_buffer_size: surface_max_size,
            linear_pitch_alignment: 64,
            buffer_pitch_alignment: 32,
            ccs_ratio: 256,
            aux_table_granularity: 64 * KB,
        }
    }

    #[inline]
    pub fn has(&self, feature: SkuFeatures) -> bool {
        self.sku.contains(feature)
    }

    #[inline]
    pub fn has_wa(&self, wa: WaTable) -> bool {
        self.wa.contains(wa)
    }

    /// Returns `true` if the tiling exists on this generation.
    pub fn supports_tiling(&self, tiling: Tiling) -> bool {
        let g = self.generation;
        match tiling {
            Tiling::Linear | Tiling::Auto => true,
            Tiling::TileX => true,
            Tiling::TileY => g <= Generation::Gen12,
            Tiling::TileYf | Tiling::TileYs => g >= Generation::Gen9 && g <= Generation::Gen12,
            Tiling::Tile4 | Tiling::Tile64 => g >= Generation::XeLpg,
        }
    }

    /// Returns tiling picked for `Tiling::Auto`.
    pub fn preferred_tiling(&self) -> Tiling {
        if self.generation >= Generation::XeLpg {
            Tiling::Tile4
        } else {
            Tiling::TileY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilings_per_generation() {
        let gen8 = Platform::new(&Config::for_generation(Generation::Gen8));
        assert!(gen8.supports_tiling(Tiling::TileY));
        assert!(!gen8.supports_tiling(Tiling::TileYs));

        let gen12 = Platform::new(&Config::for_generation(Generation::Gen12));
        assert!(gen12.supports_tiling(Tiling::TileYf));
        assert!(!gen12.supports_tiling(Tiling::Tile4));

        let xe2 = Platform::new(&Config::for_generation(Generation::Xe2Lpg));
        assert!(!xe2.supports_tiling(Tiling::TileY));
        assert!(xe2.supports_tiling(Tiling::Tile64));
        assert_eq!(xe2.preferred_tiling(), Tiling::Tile4);
    }

    #[test]
    fn depth_16bpp_alignment_changes_on_gen10() {
        let gen9 = Platform::new(&Config::for_generation(Generation::Gen9));
        let gen10 = Platform::new(&Config::for_generation(Generation::Gen10));
        assert_eq!(gen9.tex_align.depth_16bpp_2x_8x, a(8, 8));
        assert_eq!(gen10.tex_align.depth_16bpp_2x_8x, a(8, 4));
    }
}
