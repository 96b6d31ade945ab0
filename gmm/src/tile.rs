use {
    crate::error::LayoutError,
    gmm_types::{ResourceType, Tiling},
};

/// Dimensionality of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileDim {
    OneD,
    TwoD,
    ThreeD,
}

impl TileDim {
    pub fn of(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::Buffer | ResourceType::Texture1D => TileDim::OneD,
            ResourceType::Texture2D | ResourceType::Cube => TileDim::TwoD,
            ResourceType::Texture3D => TileDim::ThreeD,
        }
    }
}

/// Footprint of one tile.
/// `width_bytes * height_rows * depth` is the tile size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGeometry {
    pub width_bytes: u32,
    pub height_rows: u32,
    pub depth: u32,
}

impl TileGeometry {
    pub const LINEAR: TileGeometry = TileGeometry {
        width_bytes: 1,
        height_rows: 1,
        depth: 1,
    };

    /// Size of the tile in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        u64::from(self.width_bytes) * u64::from(self.height_rows) * u64::from(self.depth)
    }

    /// Width of the tile in elements of `bits_per_element` size.
    #[inline]
    pub fn width_elements(&self, bits_per_element: u32) -> u32 {
        self.width_bytes * 8 / bits_per_element
    }
}

const fn t(width_bytes: u32, height_rows: u32, depth: u32) -> TileGeometry {
    TileGeometry {
        width_bytes,
        height_rows,
        depth,
    }
}

/// Index of bits-per-element class in per-class tables:
/// 0 - 8bpp, 1 - 16bpp, 2 - 32bpp, 3 - 64bpp, 4 - 128bpp.
pub fn bpp_class(bits_per_element: u32) -> Option<usize> {
    match bits_per_element {
        8 => Some(0),
        16 => Some(1),
        32 => Some(2),
        64 => Some(3),
        128 => Some(4),
        _ => None,
    }
}

const TILE_X: TileGeometry = t(512, 8, 1);
const TILE_Y: TileGeometry = t(128, 32, 1);
const TILE_4: TileGeometry = t(128, 32, 1);

// 4KiB standard swizzle tiles, by bpp class.
const TILE_YF_1D: TileGeometry = t(4096, 1, 1);
const TILE_YF_2D: [TileGeometry; 5] = [
    t(64, 64, 1),
    t(128, 32, 1),
    t(128, 32, 1),
    t(256, 16, 1),
    t(256, 16, 1),
];
const TILE_YF_3D: [TileGeometry; 5] = [
    t(16, 16, 16),
    t(32, 16, 8),
    t(32, 16, 8),
    t(64, 8, 8),
    t(64, 8, 8),
];

// 64KiB standard swizzle tiles, by bpp class. Shared by TileYs and Tile64.
const TILE_64KB_1D: TileGeometry = t(64 * 1024, 1, 1);
const TILE_64KB_2D: [TileGeometry; 5] = [
    t(256, 256, 1),
    t(512, 128, 1),
    t(512, 128, 1),
    t(1024, 64, 1),
    t(1024, 64, 1),
];
const TILE_64KB_3D: [TileGeometry; 5] = [
    t(64, 32, 32),
    t(64, 32, 32),
    t(128, 32, 16),
    t(256, 16, 16),
    t(256, 16, 16),
];

/// Returns geometry of tile used by `tiling` for resources of `dim` with `bits_per_element`.
pub fn tile_geometry(
    tiling: Tiling,
    dim: TileDim,
    bits_per_element: u32,
) -> Result<TileGeometry, LayoutError> {
    let class = || {
        bpp_class(bits_per_element).ok_or(LayoutError::InvalidDescriptor(
            "standard tiling requires power of two element size",
        ))
    };

    let geometry = match tiling {
        Tiling::Linear | Tiling::Auto => TileGeometry::LINEAR,
        Tiling::TileX => TILE_X,
        Tiling::TileY => TILE_Y,
        Tiling::Tile4 => TILE_4,
        Tiling::TileYf => match dim {
            TileDim::OneD => TILE_YF_1D,
            TileDim::TwoD => TILE_YF_2D[class()?],
            TileDim::ThreeD => TILE_YF_3D[class()?],
        },
        Tiling::TileYs | Tiling::Tile64 => match dim {
            TileDim::OneD => TILE_64KB_1D,
            TileDim::TwoD => TILE_64KB_2D[class()?],
            TileDim::ThreeD => TILE_64KB_3D[class()?],
        },
    };

    Ok(geometry)
}
