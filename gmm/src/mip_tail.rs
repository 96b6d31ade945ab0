//! Packed mip-tail tables.
//!
//! Mip levels small enough to fit in half of a standard swizzle tile are packed
//! together into a single tile. Each packed level occupies a slot with fixed
//! byte and geometric offset inside the tile. TileYs/Tile64 tails use slots
//! `0..15`, TileYf tails use the same table starting at slot 4.
//!
//! Tables are indexed by `[slot][bpp class]` where bpp class is
//! 8, 16, 32, 64 and 128 bits per element. Geometric offsets are in elements.

use {
    crate::{error::LayoutError, platform::KB, tile::TileDim},
    gmm_types::Tiling,
};

/// Number of slots in a 64KiB tile mip-tail.
pub const MIP_TAIL_SLOTS: u32 = 15;

/// Slot of the first TileYf mip-tail level.
pub const TILE_YF_FIRST_SLOT: u32 = 4;

/// Offset inside a tile. `x` is in bytes, `y` in rows and `z` in slices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

const fn o(x: u32, y: u32) -> Offset3 {
    Offset3 { x, y, z: 0 }
}

const fn o3(x: u32, y: u32, z: u32) -> Offset3 {
    Offset3 { x, y, z }
}

const GEN9_BYTE_OFFSET_1D: [u64; 15] = [
    32 * KB,
    16 * KB,
    8 * KB,
    4 * KB,
    2 * KB,
    1536,
    1280,
    1024,
    768,
    512,
    256,
    192,
    128,
    64,
    0,
];

const GEN9_BYTE_OFFSET_2D: [u64; 15] = [
    32 * KB,
    16 * KB,
    8 * KB,
    4 * KB,
    2 * KB,
    1 * KB,
    768,
    512,
    448,
    384,
    320,
    256,
    192,
    128,
    64,
];

const GEN9_BYTE_OFFSET_3D: [u64; 15] = [
    32 * KB,
    16 * KB,
    8 * KB,
    4 * KB,
    3 * KB,
    2 * KB,
    1 * KB,
    768,
    512,
    448,
    384,
    320,
    256,
    128,
    0,
];

const STANDARD_BYTE_OFFSET_2D: [u64; 15] = [
    32 * KB,
    16 * KB,
    8 * KB,
    4 * KB,
    2 * KB,
    1 * KB,
    768,
    512,
    448,
    384,
    320,
    256,
    128,
    64,
    0,
];

const STANDARD_BYTE_OFFSET_3D: [u64; 15] = [
    32 * KB,
    16 * KB,
    8 * KB,
    4 * KB,
    2 * KB,
    1 * KB,
    768,
    512,
    448,
    384,
    320,
    256,
    192,
    128,
    64,
];

#[rustfmt::skip]
const GEN9_GEOMETRY_2D: [[Offset3; 5]; 15] = [
    //  8bpp           16bpp          32bpp          64bpp          128bpp
    [o(128, 0),     o(128, 0),     o(64, 0),      o(64, 0),      o(32, 0)],
    [o(0, 128),     o(0, 64),      o(0, 64),      o(0, 32),      o(0, 32)],
    [o(64, 0),      o(64, 0),      o(32, 0),      o(32, 0),      o(16, 0)],
    [o(0, 64),      o(0, 32),      o(0, 32),      o(0, 16),      o(0, 16)],
    [o(32, 0),      o(32, 0),      o(16, 0),      o(16, 0),      o(8, 0)],
    [o(16, 32),     o(16, 16),     o(8, 16),      o(8, 8),       o(4, 8)],
    [o(0, 48),      o(0, 24),      o(0, 24),      o(0, 12),      o(0, 12)],
    [o(0, 32),      o(0, 16),      o(0, 16),      o(0, 8),       o(0, 8)],
    [o(16, 16),     o(16, 8),      o(8, 8),       o(8, 4),       o(4, 4)],
    [o(16, 0),      o(16, 0),      o(8, 0),       o(8, 0),       o(4, 0)],
    [o(0, 16),      o(0, 8),       o(0, 8),       o(0, 4),       o(0, 4)],
    [o(0, 12),      o(8, 4),       o(4, 4),       o(6, 0),       o(3, 0)],
    [o(0, 8),       o(8, 0),       o(4, 0),       o(4, 0),       o(2, 0)],
    [o(0, 4),       o(0, 4),       o(0, 4),       o(2, 0),       o(1, 0)],
    [o(0, 0),       o(0, 0),       o(0, 0),       o(0, 0),       o(0, 0)],
];

#[rustfmt::skip]
const STANDARD_GEOMETRY_2D: [[Offset3; 5]; 15] = [
    //  8bpp           16bpp          32bpp          64bpp          128bpp
    [o(128, 0),     o(128, 0),     o(64, 0),      o(64, 0),      o(32, 0)],
    [o(0, 128),     o(0, 64),      o(0, 64),      o(0, 32),      o(0, 32)],
    [o(64, 0),      o(64, 0),      o(32, 0),      o(32, 0),      o(16, 0)],
    [o(0, 64),      o(0, 32),      o(0, 32),      o(0, 16),      o(0, 16)],
    [o(32, 0),      o(32, 0),      o(16, 0),      o(16, 0),      o(8, 0)],
    [o(16, 32),     o(16, 16),     o(8, 16),      o(8, 8),       o(4, 8)],
    [o(0, 48),      o(0, 24),      o(0, 24),      o(0, 12),      o(0, 12)],
    [o(0, 32),      o(0, 16),      o(0, 16),      o(0, 8),       o(0, 8)],
    [o(16, 16),     o(16, 8),      o(8, 8),       o(8, 4),       o(4, 4)],
    [o(16, 0),      o(16, 0),      o(8, 0),       o(8, 0),       o(4, 0)],
    [o(0, 16),      o(0, 8),       o(0, 8),       o(0, 4),       o(0, 4)],
    [o(8, 8),       o(8, 4),       o(4, 4),       o(4, 2),       o(2, 2)],
    [o(8, 0),       o(8, 0),       o(4, 0),       o(4, 0),       o(2, 0)],
    [o(0, 8),       o(0, 4),       o(0, 4),       o(0, 2),       o(0, 2)],
    [o(0, 0),       o(0, 0),       o(0, 0),       o(0, 0),       o(0, 0)],
];

#[rustfmt::skip]
const GEN9_GEOMETRY_3D: [[Offset3; 5]; 15] = [
    //  8bpp            16bpp           32bpp           64bpp           128bpp
    [o3(32, 0, 0),   o3(16, 0, 0),   o3(16, 0, 0),   o3(16, 0, 0),   o3(8, 0, 0)],
    [o3(0, 16, 0),   o3(0, 16, 0),   o3(0, 16, 0),   o3(0, 8, 0),    o3(0, 8, 0)],
    [o3(0, 0, 16),   o3(0, 0, 16),   o3(0, 0, 8),    o3(0, 0, 8),    o3(0, 0, 8)],
    [o3(16, 0, 0),   o3(8, 0, 0),    o3(8, 0, 0),    o3(8, 0, 0),    o3(4, 0, 0)],
    [o3(0, 8, 0),    o3(0, 8, 0),    o3(0, 8, 0),    o3(0, 4, 0),    o3(0, 4, 0)],
    [o3(0, 0, 8),    o3(0, 0, 4),    o3(0, 0, 4),    o3(0, 0, 4),    o3(0, 0, 4)],
    [o3(8, 0, 0),    o3(8, 0, 0),    o3(4, 0, 0),    o3(4, 0, 0),    o3(2, 0, 0)],
    [o3(0, 4, 0),    o3(0, 4, 0),    o3(0, 4, 0),    o3(0, 2, 0),    o3(0, 2, 0)],
    [o3(0, 0, 4),    o3(0, 0, 2),    o3(0, 0, 2),    o3(0, 0, 2),    o3(0, 0, 2)],
    [o3(4, 0, 0),    o3(4, 0, 0),    o3(2, 0, 0),    o3(2, 0, 0),    o3(1, 0, 0)],
    [o3(0, 2, 0),    o3(0, 2, 0),    o3(0, 2, 0),    o3(0, 1, 0),    o3(0, 1, 0)],
    [o3(0, 0, 2),    o3(0, 0, 1),    o3(0, 0, 1),    o3(0, 0, 1),    o3(0, 0, 1)],
    [o3(2, 0, 0),    o3(2, 0, 0),    o3(1, 0, 0),    o3(1, 0, 0),    o3(1, 1, 0)],
    [o3(0, 1, 0),    o3(0, 1, 0),    o3(0, 1, 0),    o3(1, 1, 0),    o3(0, 1, 1)],
    [o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0)],
];

#[rustfmt::skip]
const STANDARD_GEOMETRY_3D: [[Offset3; 5]; 15] = [
    //  8bpp            16bpp           32bpp           64bpp           128bpp
    [o3(32, 0, 0),   o3(16, 0, 0),   o3(16, 0, 0),   o3(16, 0, 0),   o3(8, 0, 0)],
    [o3(0, 16, 0),   o3(0, 16, 0),   o3(0, 16, 0),   o3(0, 8, 0),    o3(0, 8, 0)],
    [o3(0, 0, 16),   o3(0, 0, 16),   o3(0, 0, 8),    o3(0, 0, 8),    o3(0, 0, 8)],
    [o3(16, 0, 0),   o3(8, 0, 0),    o3(8, 0, 0),    o3(8, 0, 0),    o3(4, 0, 0)],
    [o3(0, 8, 0),    o3(0, 8, 0),    o3(0, 8, 0),    o3(0, 4, 0),    o3(0, 4, 0)],
    [o3(0, 0, 8),    o3(0, 0, 4),    o3(0, 0, 4),    o3(0, 0, 4),    o3(0, 0, 4)],
    [o3(8, 0, 0),    o3(8, 0, 0),    o3(4, 0, 0),    o3(4, 0, 0),    o3(2, 0, 0)],
    [o3(0, 4, 0),    o3(0, 4, 0),    o3(0, 4, 0),    o3(0, 2, 0),    o3(0, 2, 0)],
    [o3(0, 0, 4),    o3(0, 0, 2),    o3(0, 0, 2),    o3(0, 0, 2),    o3(0, 0, 2)],
    [o3(4, 0, 0),    o3(4, 0, 0),    o3(2, 0, 0),    o3(2, 0, 0),    o3(1, 0, 0)],
    [o3(0, 2, 0),    o3(0, 2, 0),    o3(0, 2, 0),    o3(0, 1, 0),    o3(0, 1, 0)],
    [o3(0, 0, 2),    o3(0, 0, 1),    o3(0, 0, 1),    o3(0, 0, 1),    o3(0, 0, 1)],
    [o3(2, 2, 0),    o3(2, 2, 0),    o3(1, 2, 0),    o3(1, 1, 0),    o3(1, 1, 0)],
    [o3(1, 1, 1),    o3(1, 1, 1),    o3(1, 1, 1),    o3(1, 1, 1),    o3(0, 1, 1)],
    [o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0),    o3(0, 0, 0)],
];

/// Returns slot of `lod` in mip-tail starting at `tail_start_lod`.
pub fn slot(tiling: Tiling, lod: u32, tail_start_lod: u32) -> u32 {
    let adjustment = if tiling == Tiling::TileYf {
        TILE_YF_FIRST_SLOT
    } else {
        0
    };
    lod - tail_start_lod + adjustment
}

fn check_slot(slot: u32) -> Result<usize, LayoutError> {
    if slot < MIP_TAIL_SLOTS {
        Ok(slot as usize)
    } else {
        Err(LayoutError::MipTailSlot(slot))
    }
}

fn scale_x(offset: Offset3, bits_per_element: u32) -> Offset3 {
    Offset3 {
        x: offset.x * bits_per_element / 8,
        ..offset
    }
}

/// Byte offset of a slot inside the tile in Gen9 layout.
pub fn gen9_byte_offset(dim: TileDim, slot: u32) -> Result<u64, LayoutError> {
    let slot = check_slot(slot)?;
    Ok(match dim {
        TileDim::OneD => GEN9_BYTE_OFFSET_1D[slot],
        TileDim::TwoD => GEN9_BYTE_OFFSET_2D[slot],
        TileDim::ThreeD => GEN9_BYTE_OFFSET_3D[slot],
    })
}

/// Geometric offset of a slot inside the tile in Gen9 layout.
/// `class` is bpp class of the format.
pub fn gen9_geometry_offset(
    dim: TileDim,
    class: usize,
    bits_per_element: u32,
    slot: u32,
) -> Result<Offset3, LayoutError> {
    let slot = check_slot(slot)?;
    let offset = match dim {
        TileDim::OneD => o(GEN9_BYTE_OFFSET_1D[slot] as u32, 0),
        TileDim::TwoD => scale_x(GEN9_GEOMETRY_2D[slot][class], bits_per_element),
        TileDim::ThreeD => scale_x(GEN9_GEOMETRY_3D[slot][class], bits_per_element),
    };
    Ok(offset)
}

/// Byte offset of a slot inside the tile in standard layout.
pub fn standard_byte_offset(dim: TileDim, slot: u32) -> Result<u64, LayoutError> {
    let slot = check_slot(slot)?;
    Ok(match dim {
        TileDim::OneD => GEN9_BYTE_OFFSET_1D[slot],
        TileDim::TwoD => STANDARD_BYTE_OFFSET_2D[slot],
        TileDim::ThreeD => STANDARD_BYTE_OFFSET_3D[slot],
    })
}

/// Geometric offset of a slot inside the tile in standard layout.
pub fn standard_geometry_offset(
    dim: TileDim,
    class: usize,
    bits_per_element: u32,
    slot: u32,
) -> Result<Offset3, LayoutError> {
    let slot = check_slot(slot)?;
    let offset = match dim {
        TileDim::OneD => o(GEN9_BYTE_OFFSET_1D[slot] as u32, 0),
        TileDim::TwoD => scale_x(STANDARD_GEOMETRY_2D[slot][class], bits_per_element),
        TileDim::ThreeD => scale_x(STANDARD_GEOMETRY_3D[slot][class], bits_per_element),
    };
    Ok(offset)
}

/// Extent of a mip level in elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LevelExtent {
    pub width: u64,
    pub height: u64,
    pub depth: u64,
}

/// Returns first LOD that fits into a mip-tail slot,
/// `None` if the chain has no such level.
///
/// `slot_extent` is extent of the largest slot in elements,
/// `level` returns extent of a level in elements.
pub(crate) fn tail_start_lod(
    dim: TileDim,
    max_lod: u32,
    slot_extent: LevelExtent,
    level: impl Fn(u32) -> LevelExtent,
) -> Option<u32> {
    if max_lod == 0 {
        return None;
    }

    (0..=max_lod).find(|&lod| {
        let extent = level(lod);
        match dim {
            TileDim::OneD => extent.width <= slot_extent.width,
            TileDim::TwoD => {
                extent.width <= slot_extent.width && extent.height <= slot_extent.height
            }
            TileDim::ThreeD => {
                extent.width <= slot_extent.width
                    && extent.height <= slot_extent.height
                    && extent.depth <= slot_extent.depth
            }
        }
    })
}
