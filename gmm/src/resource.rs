use {
    crate::{
        align_down,
        cache_policy::MemoryObject,
        error::LayoutError,
        texture::{AuxKind, AuxLayout, MipOffset, Plane, PlaneLayout, TextureLayout},
    },
    gmm_types::{
        GfxAddress, GfxHeap, OutOfGfxMemory, ResourceDescriptor, ResourceFlags, ResourceType,
        ResourceUsage, SamplePattern, Tiling,
    },
};

/// Subresource to locate with [`ResourceInfo::offset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OffsetRequest {
    pub lod: u32,
    pub array_index: u32,

    /// Face of cube resources, `0..6`.
    pub cube_face: u32,

    /// Depth slice of 3D resources.
    pub slice: u32,

    /// Sample of arrayed multisampled resources.
    pub sample: u32,

    /// Plane of planar resources. `None` selects luma.
    pub plane: Option<Plane>,
}

impl OffsetRequest {
    pub fn lod(lod: u32) -> Self {
        OffsetRequest {
            lod,
            ..OffsetRequest::default()
        }
    }
}

/// Offset programmed into surface state.
/// `offset` is aligned to the tile, `x` and `y` locate subresource inside the tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderOffset {
    pub offset: u64,

    /// In elements.
    pub x: u32,

    /// In rows.
    pub y: u32,
    pub z: u32,
}

/// Offset for CPU access through a linear view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LockOffset {
    pub offset: u64,
    pub pitch: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceOffset {
    pub render: RenderOffset,

    /// `None` for resources with `NOT_LOCKABLE` flag.
    pub lock: Option<LockOffset>,
}

/// Resource with computed layout and cache policy.
/// Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceInfo {
    desc: ResourceDescriptor,
    layout: TextureLayout,
    memory_object: MemoryObject,
}

impl ResourceInfo {
    pub(crate) fn new(
        desc: ResourceDescriptor,
        layout: TextureLayout,
        memory_object: MemoryObject,
    ) -> Self {
        ResourceInfo {
            desc: ResourceDescriptor {
                tiling: layout.tiling,
                ..desc
            },
            layout,
            memory_object,
        }
    }

    /// Returns descriptor with resolved tiling.
    #[inline]
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.desc
    }

    #[inline]
    pub fn layout(&self) -> &TextureLayout {
        &self.layout
    }

    #[inline]
    pub fn pitch(&self) -> u64 {
        self.layout.pitch
    }

    #[inline]
    pub fn qpitch(&self) -> u64 {
        self.layout.qpitch
    }

    #[inline]
    pub fn height(&self) -> u64 {
        self.layout.height
    }

    #[inline]
    pub fn alignment(&self) -> u64 {
        self.layout.alignment
    }

    #[inline]
    pub fn tile_mode(&self) -> Tiling {
        self.layout.tiling
    }

    #[inline]
    pub fn mip_tail_start_lod(&self) -> Option<u32> {
        self.layout.mip_tail_start_lod
    }

    /// Size of the main surface without aux.
    #[inline]
    pub fn size_main_surface(&self) -> u64 {
        self.layout.size
    }

    /// Size of the allocation, including unified aux surfaces.
    #[inline]
    pub fn size_allocation(&self) -> u64 {
        self.layout.size_allocation()
    }

    /// Size of the primary aux surface. Zero if the resource has none.
    /// HiZ or MCS is primary when present, CCS otherwise.
    pub fn size_aux_surface(&self) -> u64 {
        self.layout.aux.as_ref().map_or(0, |aux| aux.size)
    }

    /// Size of CCS of a compressed resource that also has HiZ or MCS.
    pub fn size_secondary_aux_surface(&self) -> u64 {
        self.layout.secondary_aux.as_ref().map_or(0, |aux| aux.size)
    }

    /// Aux surface of `kind`, if the resource has one.
    #[inline]
    pub fn aux_surface(&self, kind: AuxKind) -> Option<&AuxLayout> {
        self.layout.aux_surface(kind)
    }

    /// Offset of unified aux surface from the start of allocation.
    pub fn aux_offset(&self) -> Option<u64> {
        self.layout
            .aux
            .as_ref()
            .filter(|aux| aux.unified)
            .map(|aux| aux.offset)
    }

    /// Offset of unified secondary aux surface from the start of allocation.
    pub fn secondary_aux_offset(&self) -> Option<u64> {
        self.layout
            .secondary_aux
            .as_ref()
            .filter(|aux| aux.unified)
            .map(|aux| aux.offset)
    }

    /// Pitch of unified aux surface. Zero for linear CCS.
    pub fn unified_aux_pitch(&self) -> Option<u64> {
        self.layout
            .aux
            .as_ref()
            .filter(|aux| aux.unified)
            .map(|aux| aux.pitch)
    }

    /// Number of planes. `1` for non-planar resources.
    pub fn planes(&self) -> u32 {
        self.layout.planes.as_ref().map_or(1, |planes| planes.count)
    }

    pub fn plane_layout(&self) -> Option<&PlaneLayout> {
        self.layout.planes.as_ref()
    }

    /// Byte offset of the plane from the start of the surface.
    pub fn plane_offset(&self, plane: Plane) -> Result<u64, LayoutError> {
        let (x, y) = self.plane_position(Some(plane))?;
        Ok(y * self.layout.pitch + x)
    }

    pub fn mip_offset(&self, lod: u32) -> Result<&MipOffset, LayoutError> {
        self.layout
            .mips
            .get(lod as usize)
            .ok_or(LayoutError::OutOfRange)
    }

    /// Usage selecting cache policy of the resource.
    #[inline]
    pub fn cache_usage(&self) -> ResourceUsage {
        self.desc.usage
    }

    #[inline]
    pub fn memory_object(&self) -> MemoryObject {
        self.memory_object
    }

    /// Returns size and alignment of the allocation for the resource.
    pub fn allocation_request(&self) -> (u64, u64) {
        (self.size_allocation(), self.layout.alignment)
    }

    /// Reserves graphics address range for the resource from the heap.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, heap)))]
    pub fn reserve_gfx_address(
        &self,
        heap: &mut impl GfxHeap,
    ) -> Result<GfxAddress, OutOfGfxMemory> {
        let (size, alignment) = self.allocation_request();
        heap.reserve(size, alignment)
    }

    /// Locates subresource for surface state and CPU access.
    pub fn offset(&self, request: OffsetRequest) -> Result<SurfaceOffset, LayoutError> {
        let slice = self.slice_index(&request)?;
        let position = self.layout.position(request.lod, slice)?;
        let (plane_x, plane_y) = self.plane_position(request.plane)?;

        let x_bytes = position.x_bytes + plane_x;
        let y_rows = position.y_rows + plane_y;
        let pitch = self.layout.pitch;

        let lock = if self.desc.flags.contains(ResourceFlags::NOT_LOCKABLE) {
            None
        } else {
            Some(LockOffset {
                offset: y_rows * pitch + x_bytes,
                pitch,
            })
        };

        let render = if self.layout.tiling.is_tiled() {
            let tile = self.layout.tile;
            let tile_width = u64::from(tile.width_bytes);
            let tile_height = u64::from(tile.height_rows);
            let element_bytes = u64::from(self.desc.format.info().bits_per_element / 8).max(1);

            let tile_row = align_down(y_rows, tile_height - 1);
            let tile_column = align_down(x_bytes, tile_width - 1);

            RenderOffset {
                offset: tile_row * pitch * u64::from(tile.depth)
                    + tile_column * tile_height * u64::from(tile.depth),
                x: ((x_bytes - tile_column) / element_bytes) as u32,
                y: (y_rows - tile_row) as u32,
                z: position.z,
            }
        } else {
            RenderOffset {
                offset: y_rows * pitch + x_bytes,
                x: 0,
                y: 0,
                z: 0,
            }
        };

        Ok(SurfaceOffset { render, lock })
    }

    /// Validates request and returns slice index in the layout.
    fn slice_index(&self, request: &OffsetRequest) -> Result<u32, LayoutError> {
        let desc = &self.desc;
        if request.lod > desc.max_lod || request.array_index >= desc.array_size {
            return Err(LayoutError::OutOfRange);
        }

        let faces = if desc.resource_type == ResourceType::Cube {
            6
        } else {
            1
        };
        if request.cube_face >= faces {
            return Err(LayoutError::OutOfRange);
        }

        let samples = if desc.msaa.pattern == SamplePattern::Arrayed {
            desc.msaa.samples.max(1)
        } else {
            1
        };
        if request.sample >= samples {
            return Err(LayoutError::OutOfRange);
        }

        if desc.resource_type == ResourceType::Texture3D {
            let depth = (desc.depth >> request.lod).max(1);
            if request.slice >= depth {
                return Err(LayoutError::OutOfRange);
            }
            return Ok(request.slice);
        }

        if request.slice != 0 {
            return Err(LayoutError::OutOfRange);
        }

        Ok((request.array_index * faces + request.cube_face) * samples + request.sample)
    }

    fn plane_position(&self, plane: Option<Plane>) -> Result<(u64, u64), LayoutError> {
        match (&self.layout.planes, plane) {
            (Some(planes), Some(plane)) => {
                if plane as u32 >= planes.count && !(planes.count == 2 && plane == Plane::V) {
                    return Err(LayoutError::OutOfRange);
                }
                Ok(planes.offset(plane))
            }
            (_, None) | (_, Some(Plane::Y)) => Ok((0, 0)),
            (None, Some(_)) => Err(LayoutError::OutOfRange),
        }
    }
}
