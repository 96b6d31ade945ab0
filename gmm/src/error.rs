use {
    crate::platform::Generation,
    core::fmt::{self, Display},
    gmm_types::{Format, OutOfGfxMemory, ResourceType, ResourceUsage, Tiling},
};

/// Error returned when layout of a resource can't be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutError {
    /// Descriptor is malformed, e.g. has zero extent.
    InvalidDescriptor(&'static str),

    /// Format can't be used with requested resource type or tiling.
    UnsupportedFormat(Format),

    /// Tiling is not available on the generation or for the resource.
    UnsupportedTiling {
        tiling: Tiling,
        generation: Generation,
    },

    /// Sample count is not supported for the resource type or format.
    UnsupportedMsaa {
        samples: u32,
        resource_type: ResourceType,
    },

    /// Dimension exceeds limits of the generation.
    ExceedsLimits(&'static str),

    /// Computed size exceeds maximum surface size of the generation.
    SizeOverflow,

    /// Mip-tail slot index out of table range.
    MipTailSlot(u32),

    /// Requested mip level, array slice or plane doesn't exist.
    OutOfRange,
}

impl Display for LayoutError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidDescriptor(reason) => {
                write!(fmt, "Invalid resource descriptor: {}", reason)
            }
            LayoutError::UnsupportedFormat(format) => {
                write!(fmt, "Format {:?} is not supported for the resource", format)
            }
            LayoutError::UnsupportedTiling { tiling, generation } => write!(
                fmt,
                "Tiling {:?} is not supported on {:?} for the resource",
                tiling, generation
            ),
            LayoutError::UnsupportedMsaa {
                samples,
                resource_type,
            } => write!(
                fmt,
                "{}x multisampling is not supported for {:?}",
                samples, resource_type
            ),
            LayoutError::ExceedsLimits(what) => write!(fmt, "Resource {} exceeds limits", what),
            LayoutError::SizeOverflow => fmt.write_str("Surface size exceeds maximum"),
            LayoutError::MipTailSlot(slot) => write!(fmt, "Mip-tail slot {} out of range", slot),
            LayoutError::OutOfRange => {
                fmt.write_str("Requested subresource doesn't exist in the resource")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CachePolicyError {
    /// Usage has no entry in cache policy table.
    Uninitialized(ResourceUsage),

    /// Hardware index table has no room for new entry.
    TableExhausted(ResourceUsage),

    /// Fixed hardware table has no entry with cacheability requested for the usage.
    NoMatchingEntry(ResourceUsage),
}

impl Display for CachePolicyError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CachePolicyError::Uninitialized(usage) => {
                write!(fmt, "Cache policy for {:?} is not initialized", usage)
            }
            CachePolicyError::TableExhausted(usage) => {
                write!(fmt, "No free MOCS index left for {:?}", usage)
            }
            CachePolicyError::NoMatchingEntry(usage) => {
                write!(fmt, "No cache policy table entry matches {:?}", usage)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CachePolicyError {}

/// Error returned by resource creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceError {
    Layout(LayoutError),
    CachePolicy(CachePolicyError),
    OutOfGfxMemory(OutOfGfxMemory),
}

impl From<LayoutError> for ResourceError {
    fn from(err: LayoutError) -> Self {
        ResourceError::Layout(err)
    }
}

impl From<CachePolicyError> for ResourceError {
    fn from(err: CachePolicyError) -> Self {
        ResourceError::CachePolicy(err)
    }
}

impl From<OutOfGfxMemory> for ResourceError {
    fn from(err: OutOfGfxMemory) -> Self {
        ResourceError::OutOfGfxMemory(err)
    }
}

impl Display for ResourceError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Layout(err) => Display::fmt(err, fmt),
            ResourceError::CachePolicy(err) => Display::fmt(err, fmt),
            ResourceError::OutOfGfxMemory(err) => Display::fmt(err, fmt),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResourceError {}

/// Error returned when context can't be created for the configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextError {
    /// SKU features or workarounds contradict each other or the generation.
    InvalidConfig(&'static str),

    CachePolicy(CachePolicyError),
}

impl From<CachePolicyError> for ContextError {
    fn from(err: CachePolicyError) -> Self {
        ContextError::CachePolicy(err)
    }
}

impl Display for ContextError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::InvalidConfig(reason) => write!(fmt, "Invalid configuration: {}", reason),
            ContextError::CachePolicy(err) => {
                write!(fmt, "Failed to build cache policy: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContextError {}
