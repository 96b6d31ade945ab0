//! Per-generation texture layout calculator.
//!
//! Every generation is described by a [`TextureOps`] table.
//! Tables of newer generations are built from the previous one
//! replacing only routines whose hardware behavior changed.

mod aux;
mod common;
mod gen10;
mod gen11;
mod gen12;
mod gen9;
mod planar;
mod xe2;
mod xe_lpg;

pub use self::{
    aux::{AuxKind, AuxLayout},
    planar::{Plane, PlaneLayout},
};

use {
    crate::{
        align_to, align_up,
        alignment::{
            expand_interleaved, legacy_alignment, standard_alignment, validate_msaa,
            AlignmentUnit,
        },
        div_ceil,
        error::LayoutError,
        mip_tail::{self, LevelExtent, Offset3},
        platform::{Generation, Platform, TexAlign, PAGE_SIZE},
        tile::{bpp_class, tile_geometry, TileDim, TileGeometry},
    },
    alloc::vec::Vec,
    gmm_types::{FormatInfo, ResourceDescriptor, ResourceFlags, ResourceType, SamplePattern, Tiling},
};

pub(crate) type FillFn = fn(&Surface<'_>) -> Result<TextureLayout, LayoutError>;

/// Routines and tables of one generation's calculator.
pub(crate) struct TextureOps {
    /// Alignment table for legacy tilings.
    pub tex_align: TexAlign,

    /// Buffers and 1D textures.
    pub fill_1d: FillFn,

    /// 2D textures and cubes.
    pub fill_2d: FillFn,
    pub fill_3d: FillFn,
    pub fill_planar: FillFn,

    pub mip_tail_byte_offset: fn(&Platform, TileDim, u32) -> Result<u64, LayoutError>,
    pub mip_tail_geometry_offset:
        fn(&Platform, TileDim, usize, u32, u32) -> Result<Offset3, LayoutError>,

    /// Attaches aux surface to computed main surface layout.
    pub aux: fn(&Surface<'_>, &mut TextureLayout) -> Result<(), LayoutError>,
}

/// Returns calculator of the generation.
pub(crate) fn ops(generation: Generation) -> &'static TextureOps {
    match generation {
        Generation::Gen8 => &common::GEN8_OPS,
        Generation::Gen9 => &gen9::GEN9_OPS,
        Generation::Gen10 => &gen10::GEN10_OPS,
        Generation::Gen11 => &gen11::GEN11_OPS,
        Generation::Gen12 => &gen12::GEN12_OPS,
        Generation::XeLpg => &xe_lpg::XE_LPG_OPS,
        Generation::Xe2Lpg | Generation::Xe3pXpc => &xe2::XE2_OPS,
    }
}

/// Placement of one mip level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MipOffset {
    /// Horizontal position of the level inside a slice in bytes.
    pub x_bytes: u64,

    /// Vertical position of the level inside a slice in rows.
    pub y_rows: u64,

    /// Depth offset inside the tile. Non-zero only for 3D mip-tail levels.
    pub z: u32,

    /// Aligned extent of the level.
    pub width_bytes: u64,
    pub height_rows: u64,

    /// Depth slices placed side by side in legacy 3D layout.
    pub slices_per_row: u32,

    /// Offset inside the mip-tail tile. `None` for levels outside of the tail.
    pub tail_byte_offset: Option<u64>,
}

/// How array slices, cube faces and depth slices are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SliceLayout {
    /// Slices are `qpitch` rows apart, each holds the whole mip chain.
    QPitch,

    /// Legacy 3D layout. Levels are stacked vertically,
    /// depth slices of level `n` are placed `1 << n` per row.
    Stacked,

    /// Depth slices are grouped by tile depth, groups are `qpitch` rows apart.
    TileGroups { depth: u32 },
}

/// Computed layout of a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureLayout {
    /// Tiling after `Tiling::Auto` resolution.
    pub tiling: Tiling,
    pub tile: TileGeometry,
    pub align: AlignmentUnit,

    /// Row pitch in bytes.
    pub pitch: u64,

    /// Total number of rows.
    pub height: u64,

    /// Distance between slices in rows.
    pub qpitch: u64,

    /// Number of slices `qpitch` apart.
    pub slices: u32,
    pub slice_layout: SliceLayout,

    /// Size of the main surface in bytes.
    pub size: u64,

    /// Required base alignment of the allocation.
    pub alignment: u64,

    pub mip_tail_start_lod: Option<u32>,
    pub mips: Vec<MipOffset>,
    pub planes: Option<PlaneLayout>,

    /// HiZ or MCS, or CCS when it is the only aux surface.
    pub aux: Option<AuxLayout>,

    /// CCS of a compressed surface that also has HiZ or MCS.
    pub secondary_aux: Option<AuxLayout>,
}

/// Position of a subresource inside the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    pub x_bytes: u64,
    pub y_rows: u64,
    pub z: u32,
}

impl TextureLayout {
    /// Size of the allocation including unified aux surfaces.
    pub fn size_allocation(&self) -> u64 {
        self.aux
            .iter()
            .chain(&self.secondary_aux)
            .filter(|aux| aux.unified)
            .map(|aux| aux.offset + aux.size)
            .fold(self.size, u64::max)
    }

    /// Aux surface of `kind`, primary or secondary.
    pub fn aux_surface(&self, kind: AuxKind) -> Option<&AuxLayout> {
        self.aux
            .iter()
            .chain(&self.secondary_aux)
            .find(|aux| aux.kind == kind)
    }

    /// Position of `slice` of level `lod`.
    /// `slice` is a depth slice for 3D textures and an array slice otherwise.
    pub(crate) fn position(&self, lod: u32, slice: u32) -> Result<Position, LayoutError> {
        let mip = self
            .mips
            .get(lod as usize)
            .ok_or(LayoutError::OutOfRange)?;
        let slice = u64::from(slice);

        let position = match self.slice_layout {
            SliceLayout::QPitch => Position {
                x_bytes: mip.x_bytes,
                y_rows: slice * self.qpitch + mip.y_rows,
                z: mip.z,
            },
            SliceLayout::Stacked => {
                let per_row = u64::from(mip.slices_per_row.max(1));
                Position {
                    x_bytes: mip.x_bytes + (slice % per_row) * mip.width_bytes,
                    y_rows: mip.y_rows + (slice / per_row) * mip.height_rows,
                    z: 0,
                }
            }
            SliceLayout::TileGroups { depth } => {
                let depth = u64::from(depth);
                Position {
                    x_bytes: mip.x_bytes,
                    y_rows: (slice / depth) * self.qpitch + mip.y_rows,
                    z: (slice % depth) as u32 + mip.z,
                }
            }
        };

        Ok(position)
    }
}

/// Resolved inputs shared by fill routines.
pub(crate) struct Surface<'a> {
    pub platform: &'a Platform,
    pub ops: &'static TextureOps,

    /// Descriptor with resolved tiling.
    pub desc: ResourceDescriptor,
    pub info: FormatInfo,
    pub dim: TileDim,
    pub tile: TileGeometry,
    pub align: AlignmentUnit,

    /// Extent of level 0 in pixels after interleaved sample expansion.
    pub width: u64,
    pub height: u64,
}

/// Extent of the mip chain of one slice.
pub(crate) struct Block {
    pub width_bytes: u64,
    pub height_rows: u64,
    pub mips: Vec<MipOffset>,
    pub mip_tail_start_lod: Option<u32>,
}

impl Surface<'_> {
    #[inline]
    pub fn tiling(&self) -> Tiling {
        self.desc.tiling
    }

    #[inline]
    pub fn is_tiled(&self) -> bool {
        self.desc.tiling.is_tiled()
    }

    pub fn mip_width(&self, lod: u32) -> u64 {
        (self.width >> lod).max(1)
    }

    pub fn mip_height(&self, lod: u32) -> u64 {
        (self.height >> lod).max(1)
    }

    pub fn mip_depth(&self, lod: u32) -> u64 {
        (u64::from(self.desc.depth) >> lod).max(1)
    }

    /// Converts width in pixels to bytes.
    pub fn px_to_bytes(&self, px: u64) -> u64 {
        div_ceil(px, u64::from(self.info.block_width)) * u64::from(self.info.bits_per_element) / 8
    }

    /// Converts height in pixels to rows.
    pub fn px_to_rows(&self, px: u64) -> u64 {
        div_ceil(px, u64::from(self.info.block_height))
    }

    /// Width of level `lod` aligned to `HAlign`, in bytes.
    pub fn level_width_bytes(&self, lod: u32) -> u64 {
        self.px_to_bytes(align_to(self.mip_width(lod), u64::from(self.align.h_align)))
    }

    /// Height of level `lod` aligned to `VAlign`, in rows.
    pub fn level_height_rows(&self, lod: u32) -> u64 {
        self.px_to_rows(align_to(self.mip_height(lod), u64::from(self.align.v_align)))
    }

    /// Number of `qpitch` strided slices of 1D and 2D resources.
    pub fn array_slices(&self) -> u32 {
        let desc = &self.desc;
        let faces = if desc.resource_type == ResourceType::Cube {
            6
        } else {
            1
        };
        let samples = if desc.msaa.pattern == SamplePattern::Arrayed {
            desc.msaa.samples
        } else {
            1
        };
        desc.array_size * faces * samples
    }

    /// First level packed into mip-tail.
    pub fn mip_tail_start_lod(&self) -> Option<u32> {
        if !self.tiling().is_standard() {
            return None;
        }

        let bpp = self.info.bits_per_element;
        let slot_extent = LevelExtent {
            width: u64::from(self.tile.width_elements(bpp) / 2),
            height: u64::from(self.tile.height_rows / 2),
            depth: u64::from(self.tile.depth / 2),
        };

        mip_tail::tail_start_lod(self.dim, self.desc.max_lod, slot_extent, |lod| {
            LevelExtent {
                width: div_ceil(self.mip_width(lod), u64::from(self.info.block_width)),
                height: div_ceil(self.mip_height(lod), u64::from(self.info.block_height)),
                depth: div_ceil(self.mip_depth(lod), u64::from(self.info.block_depth)),
            }
        })
    }

    /// Returns geometric and byte offset of `lod` inside the mip-tail tile.
    pub fn mip_tail_offset(
        &self,
        lod: u32,
        tail_start_lod: u32,
    ) -> Result<(Offset3, u64), LayoutError> {
        let bpp = self.info.bits_per_element;
        let class = bpp_class(bpp).ok_or(LayoutError::UnsupportedFormat(self.desc.format))?;
        let slot = mip_tail::slot(self.tiling(), lod, tail_start_lod);

        let geometry = (self.ops.mip_tail_geometry_offset)(self.platform, self.dim, class, bpp, slot)?;
        let byte_offset = (self.ops.mip_tail_byte_offset)(self.platform, self.dim, slot)?;
        Ok((geometry, byte_offset))
    }

    /// Aligns width of the surface in bytes to the pitch granularity.
    pub fn pitch(&self, width_bytes: u64) -> u64 {
        if self.is_tiled() {
            align_to(width_bytes, u64::from(self.tile.width_bytes))
        } else if self.desc.resource_type == ResourceType::Buffer {
            align_to(width_bytes, self.platform.buffer_pitch_alignment)
        } else {
            align_to(width_bytes, self.platform.linear_pitch_alignment)
        }
    }

    pub fn base_alignment(&self) -> u64 {
        if self.is_tiled() {
            self.tile.size().max(PAGE_SIZE)
        } else {
            PAGE_SIZE
        }
    }

    /// Builds surface layout out of one slice's mip chain.
    pub fn finish(
        &self,
        block: Block,
        slices: u32,
        slice_layout: SliceLayout,
    ) -> Result<TextureLayout, LayoutError> {
        let pitch = self.pitch(block.width_bytes);
        let qpitch = block.height_rows;

        let mut height = qpitch * u64::from(slices.max(1));
        if self.is_tiled() {
            height = align_to(height, u64::from(self.tile.height_rows));
        }

        // Rows of tile groups span all depth slices of the group.
        let depth = match slice_layout {
            SliceLayout::TileGroups { .. } => u64::from(self.tile.depth),
            _ => 1,
        };

        let alignment = self.base_alignment();
        let size = pitch
            .checked_mul(height)
            .and_then(|size| size.checked_mul(depth))
            .and_then(|size| align_up(size, alignment - 1))
            .ok_or(LayoutError::SizeOverflow)?;

        Ok(TextureLayout {
            tiling: self.tiling(),
            tile: self.tile,
            align: self.align,
            pitch,
            height,
            qpitch,
            slices,
            slice_layout,
            size,
            alignment,
            mip_tail_start_lod: block.mip_tail_start_lod,
            mips: block.mips,
            planes: None,
            aux: None,
            secondary_aux: None,
        })
    }
}

/// Computes layout of the resource for the platform.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(platform)))]
pub(crate) fn compute_layout(
    platform: &Platform,
    desc: &ResourceDescriptor,
) -> Result<TextureLayout, LayoutError> {
    let ops = ops(platform.generation);

    validate(platform, desc)?;
    validate_msaa(platform, desc)?;

    let tiling = resolve_tiling(platform, desc)?;
    let desc = ResourceDescriptor { tiling, ..*desc };
    let info = desc.format.info();
    let dim = TileDim::of(desc.resource_type);
    let tile = tile_geometry(tiling, dim, info.bits_per_element)?;

    let align = if tiling.is_standard() {
        standard_alignment(&desc, &info)?
    } else {
        legacy_alignment(platform, &desc, &info)
    };

    let (width, height) = expand_interleaved(desc.msaa, desc.base_width, desc.base_height);

    let surface = Surface {
        platform,
        ops,
        desc,
        info,
        dim,
        tile,
        align,
        width,
        height: u64::from(height),
    };

    let fill = if desc.format.is_planar() {
        ops.fill_planar
    } else {
        match desc.resource_type {
            ResourceType::Buffer | ResourceType::Texture1D => ops.fill_1d,
            ResourceType::Texture2D | ResourceType::Cube => ops.fill_2d,
            ResourceType::Texture3D => ops.fill_3d,
        }
    };

    let mut layout = fill(&surface)?;
    (ops.aux)(&surface, &mut layout)?;

    if layout.size_allocation() > platform.surface_max_size {
        #[cfg(feature = "tracing")]
        tracing::error!(
            "Surface size {} exceeds maximum {}",
            layout.size_allocation(),
            platform.surface_max_size
        );
        return Err(LayoutError::SizeOverflow);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Layout: pitch {} height {} size {} alignment {}",
        layout.pitch,
        layout.height,
        layout.size,
        layout.alignment
    );

    Ok(layout)
}

fn validate(platform: &Platform, desc: &ResourceDescriptor) -> Result<(), LayoutError> {
    if desc.base_width == 0 || desc.base_height == 0 || desc.depth == 0 || desc.array_size == 0 {
        return Err(LayoutError::InvalidDescriptor("resource has zero extent"));
    }

    match desc.resource_type {
        ResourceType::Buffer => {
            if desc.base_height != 1 || desc.depth != 1 || desc.array_size != 1 || desc.max_lod != 0
            {
                return Err(LayoutError::InvalidDescriptor(
                    "buffer must be a single row without mips",
                ));
            }
            if desc.base_width > platform.max_buffer_size {
                return Err(LayoutError::ExceedsLimits("size"));
            }
            return Ok(());
        }
        ResourceType::Texture1D if desc.base_height != 1 => {
            return Err(LayoutError::InvalidDescriptor(
                "1D texture must have height of 1",
            ));
        }
        ResourceType::Cube if desc.base_width != u64::from(desc.base_height) => {
            return Err(LayoutError::InvalidDescriptor("cube faces must be square"));
        }
        ResourceType::Texture3D => {
            if desc.array_size != 1 {
                return Err(LayoutError::InvalidDescriptor(
                    "3D texture can't have array slices",
                ));
            }
            if desc.depth > platform.max_depth {
                return Err(LayoutError::ExceedsLimits("depth"));
            }
            if desc.format.is_depth() {
                return Err(LayoutError::UnsupportedFormat(desc.format));
            }
        }
        _ if desc.depth != 1 => {
            return Err(LayoutError::InvalidDescriptor(
                "only 3D textures may have depth",
            ));
        }
        _ => {}
    }

    if desc.base_width > platform.max_width {
        return Err(LayoutError::ExceedsLimits("width"));
    }
    if desc.base_height > platform.max_height {
        return Err(LayoutError::ExceedsLimits("height"));
    }
    if desc.array_size > platform.max_array_size {
        return Err(LayoutError::ExceedsLimits("array size"));
    }

    let largest = desc
        .base_width
        .max(u64::from(desc.base_height))
        .max(u64::from(desc.depth));
    let full_chain = 63 - largest.leading_zeros();
    if desc.max_lod > full_chain {
        return Err(LayoutError::InvalidDescriptor(
            "mip chain is longer than full chain",
        ));
    }

    if desc.format.is_planar() {
        if desc.resource_type != ResourceType::Texture2D {
            return Err(LayoutError::UnsupportedFormat(desc.format));
        }
        if desc.msaa.is_multisampled() || desc.array_size > 1 || desc.max_lod > 0 {
            return Err(LayoutError::InvalidDescriptor(
                "planar resource can't have samples, array slices or mips",
            ));
        }
    }

    Ok(())
}

fn resolve_tiling(platform: &Platform, desc: &ResourceDescriptor) -> Result<Tiling, LayoutError> {
    let tiling = match desc.tiling {
        Tiling::Auto => auto_tiling(platform, desc),
        tiling => tiling,
    };

    let unsupported = !platform.supports_tiling(tiling)
        || (desc.resource_type == ResourceType::Buffer && tiling.is_tiled())
        || (desc.format.is_linear_chroma_planar() && tiling.is_tiled());

    if unsupported {
        #[cfg(feature = "tracing")]
        tracing::error!(
            "Tiling {:?} is not supported for {:?} on {:?}",
            tiling,
            desc.resource_type,
            platform.generation
        );
        return Err(LayoutError::UnsupportedTiling {
            tiling,
            generation: platform.generation,
        });
    }

    Ok(tiling)
}

fn auto_tiling(platform: &Platform, desc: &ResourceDescriptor) -> Tiling {
    let display_only = desc.flags.contains(ResourceFlags::DISPLAY)
        && !desc.flags.intersects(
            ResourceFlags::RENDER_TARGET | ResourceFlags::TEXTURE | ResourceFlags::DEPTH,
        );

    match desc.resource_type {
        ResourceType::Buffer | ResourceType::Texture1D => Tiling::Linear,
        _ if desc.format.is_linear_chroma_planar() => Tiling::Linear,
        _ if display_only && platform.generation < Generation::XeLpg => Tiling::TileX,
        _ => platform.preferred_tiling(),
    }
}
