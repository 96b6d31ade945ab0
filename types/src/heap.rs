use core::fmt::{self, Display};

/// Address in GPU virtual address space.
pub type GfxAddress = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutOfGfxMemory {
    /// No free range large enough for the request.
    Exhausted,

    /// Requested alignment is not a power of two.
    InvalidAlignment,
}

impl Display for OutOfGfxMemory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfGfxMemory::Exhausted => fmt.write_str("Graphics address space exhausted"),
            OutOfGfxMemory::InvalidAlignment => {
                fmt.write_str("Alignment of address range must be power of two")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfGfxMemory {}

/// Graphics virtual address space allocator.
///
/// Layout computation produces size and alignment of the allocation,
/// implementation of this trait turns them into an address range.
pub trait GfxHeap {
    /// Reserves range of `size` bytes aligned to `alignment` bytes.
    /// `alignment` must be power of two.
    fn reserve(&mut self, size: u64, alignment: u64) -> Result<GfxAddress, OutOfGfxMemory>;

    /// Releases range previously returned by `reserve`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `address` was not reserved from this heap.
    fn release(&mut self, address: GfxAddress);
}
