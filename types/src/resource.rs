use crate::{format::Format, usage::ResourceUsage};

/// Dimensionality of a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceType {
    Buffer,
    Texture1D,
    Texture2D,
    Texture3D,
    Cube,
}

/// Tiling mode requested for a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tiling {
    Linear,
    TileX,
    TileY,
    TileYf,
    TileYs,
    Tile4,
    Tile64,

    /// Let the calculator pick the preferred tiling for the generation and usage.
    Auto,
}

impl Tiling {
    /// Returns `true` for tilings with the standard (hardware-defined) swizzle,
    /// which support packed mip-tails.
    #[inline]
    pub fn is_standard(&self) -> bool {
        matches!(self, Tiling::TileYf | Tiling::TileYs | Tiling::Tile64)
    }

    /// Returns `true` for tilings with a 64KiB tile.
    #[inline]
    pub fn is_64kb(&self) -> bool {
        matches!(self, Tiling::TileYs | Tiling::Tile64)
    }

    #[inline]
    pub fn is_tiled(&self) -> bool {
        !matches!(self, Tiling::Linear | Tiling::Auto)
    }
}

/// Physical arrangement of samples of a multisampled surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplePattern {
    /// Each sample is stored as a separate array slice.
    /// Used by render targets.
    Arrayed,

    /// Samples are interleaved inside a block of pixels.
    /// Used by depth and stencil surfaces.
    Interleaved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Msaa {
    /// Number of samples per pixel. `1` for single-sampled resources.
    pub samples: u32,
    pub pattern: SamplePattern,
}

impl Msaa {
    pub const SINGLE: Msaa = Msaa {
        samples: 1,
        pattern: SamplePattern::Arrayed,
    };

    #[inline]
    pub fn is_multisampled(&self) -> bool {
        self.samples > 1
    }
}

impl Default for Msaa {
    fn default() -> Self {
        Msaa::SINGLE
    }
}

bitflags::bitflags! {
    /// Intended GPU usage of a resource.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ResourceFlags: u32 {
        const RENDER_TARGET = 0x0001;
        const DEPTH = 0x0002;
        const SEPARATE_STENCIL = 0x0004;
        const HIZ = 0x0008;
        const TEXTURE = 0x0010;
        const VIDEO = 0x0020;

        /// Surface is scanned out by display engine.
        const DISPLAY = 0x0040;

        /// Lossless render compression with a CCS aux surface.
        const RENDER_COMPRESSED = 0x0100;

        /// Media memory compression.
        const MEDIA_COMPRESSED = 0x0200;

        /// Aux surface is placed in the same allocation after the main surface.
        const UNIFIED_AUX_SURFACE = 0x0400;

        /// CPU never maps the resource.
        const NOT_LOCKABLE = 0x0800;
    }
}

impl ResourceFlags {
    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.intersects(ResourceFlags::RENDER_COMPRESSED | ResourceFlags::MEDIA_COMPRESSED)
    }
}

/// Logical description of a surface.
///
/// This is the input of layout computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDescriptor {
    pub resource_type: ResourceType,
    pub format: Format,

    /// Width in pixels. Size in bytes for buffers.
    pub base_width: u64,
    pub base_height: u32,

    /// Depth of 3D textures in pixels. Must be `1` for other types.
    pub depth: u32,

    /// Index of the smallest mip level. `0` for resources without mip chain.
    pub max_lod: u32,

    /// Number of array slices. For cubes this is the number of cubes.
    pub array_size: u32,

    pub msaa: Msaa,
    pub tiling: Tiling,
    pub flags: ResourceFlags,

    /// Cache policy key of the resource.
    pub usage: ResourceUsage,

    /// Set to `false` to force uncached memory object regardless of usage.
    pub cacheable: bool,
}

impl ResourceDescriptor {
    /// Returns descriptor of plain linear buffer of `size` bytes.
    pub fn buffer(size: u64) -> Self {
        ResourceDescriptor {
            resource_type: ResourceType::Buffer,
            format: Format::R8Unorm,
            base_width: size,
            base_height: 1,
            depth: 1,
            max_lod: 0,
            array_size: 1,
            msaa: Msaa::SINGLE,
            tiling: Tiling::Linear,
            flags: ResourceFlags::empty(),
            usage: ResourceUsage::Buffer,
            cacheable: true,
        }
    }

    pub fn texture_1d(format: Format, width: u64) -> Self {
        ResourceDescriptor {
            resource_type: ResourceType::Texture1D,
            format,
            base_width: width,
            ..ResourceDescriptor::texture_2d(format, width, 1)
        }
    }

    pub fn texture_2d(format: Format, width: u64, height: u32) -> Self {
        ResourceDescriptor {
            resource_type: ResourceType::Texture2D,
            format,
            base_width: width,
            base_height: height,
            depth: 1,
            max_lod: 0,
            array_size: 1,
            msaa: Msaa::SINGLE,
            tiling: Tiling::Auto,
            flags: ResourceFlags::TEXTURE,
            usage: ResourceUsage::Texture,
            cacheable: true,
        }
    }

    pub fn texture_3d(format: Format, width: u64, height: u32, depth: u32) -> Self {
        ResourceDescriptor {
            resource_type: ResourceType::Texture3D,
            depth,
            ..ResourceDescriptor::texture_2d(format, width, height)
        }
    }

    pub fn cube(format: Format, size: u32) -> Self {
        ResourceDescriptor {
            resource_type: ResourceType::Cube,
            ..ResourceDescriptor::texture_2d(format, u64::from(size), size)
        }
    }

    #[inline]
    pub fn with_tiling(mut self, tiling: Tiling) -> Self {
        self.tiling = tiling;
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: ResourceFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn with_mips(mut self, max_lod: u32) -> Self {
        self.max_lod = max_lod;
        self
    }

    #[inline]
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    #[inline]
    pub fn with_msaa(mut self, samples: u32, pattern: SamplePattern) -> Self {
        self.msaa = Msaa { samples, pattern };
        self
    }

    #[inline]
    pub fn with_usage(mut self, usage: ResourceUsage) -> Self {
        self.usage = usage;
        self
    }
}
