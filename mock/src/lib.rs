use {
    gmm_types::{GfxAddress, GfxHeap, OutOfGfxMemory},
    slab::Slab,
    std::ops::Range,
};

struct Reservation {
    address: GfxAddress,
    size: u64,
}

/// First-fit graphics address space allocator for tests.
pub struct MockGfxHeap {
    range: Range<GfxAddress>,

    /// Sorted, non-adjacent free ranges.
    free: Vec<Range<GfxAddress>>,
    reservations: Slab<Reservation>,

    total_reservations_counter: u64,
    total_releases_counter: u64,
}

impl MockGfxHeap {
    /// Creates heap managing `size` bytes starting at `base`.
    pub fn new(base: GfxAddress, size: u64) -> Self {
        let range = base..base + size;
        MockGfxHeap {
            free: vec![range.clone()],
            range,
            reservations: Slab::new(),
            total_reservations_counter: 0,
            total_releases_counter: 0,
        }
    }

    pub fn range(&self) -> Range<GfxAddress> {
        self.range.clone()
    }

    /// Number of bytes not reserved.
    pub fn free_bytes(&self) -> u64 {
        self.free.iter().map(|range| range.end - range.start).sum()
    }

    pub fn live_reservations(&self) -> usize {
        self.reservations.len()
    }

    pub fn total_reservations(&self) -> u64 {
        self.total_reservations_counter
    }

    pub fn total_releases(&self) -> u64 {
        self.total_releases_counter
    }
}

impl GfxHeap for MockGfxHeap {
    #[tracing::instrument(skip(self))]
    fn reserve(&mut self, size: u64, alignment: u64) -> Result<GfxAddress, OutOfGfxMemory> {
        assert_ne!(size, 0, "Reservation size must be larger than 0");

        if !alignment.is_power_of_two() {
            return Err(OutOfGfxMemory::InvalidAlignment);
        }
        let mask = alignment - 1;

        let found = self.free.iter().enumerate().find_map(|(index, range)| {
            let start = range.start.checked_add(mask)? & !mask;
            let end = start.checked_add(size)?;
            if end <= range.end {
                Some((index, start, end))
            } else {
                None
            }
        });

        let (index, start, end) = match found {
            Some(found) => found,
            None => {
                tracing::warn!("Graphics address space exhausted");
                return Err(OutOfGfxMemory::Exhausted);
            }
        };

        let range = self.free.remove(index);
        let mut insert = index;
        if range.start < start {
            self.free.insert(insert, range.start..start);
            insert += 1;
        }
        if end < range.end {
            self.free.insert(insert, end..range.end);
        }

        self.reservations.insert(Reservation {
            address: start,
            size,
        });
        self.total_reservations_counter += 1;

        tracing::info!("Reserved range at {:#x}", start);
        Ok(start)
    }

    #[tracing::instrument(skip(self))]
    fn release(&mut self, address: GfxAddress) {
        let key = self
            .reservations
            .iter()
            .find(|(_, reservation)| reservation.address == address)
            .map(|(key, _)| key)
            .expect("Non-existing reservation");

        let reservation = self.reservations.remove(key);
        let released = reservation.address..reservation.address + reservation.size;

        let index = self
            .free
            .iter()
            .position(|range| range.start > released.start)
            .unwrap_or(self.free.len());
        self.free.insert(index, released);

        // Merge with neighbours.
        if index + 1 < self.free.len() && self.free[index].end == self.free[index + 1].start {
            let next = self.free.remove(index + 1);
            self.free[index].end = next.end;
        }
        if index > 0 && self.free[index - 1].end == self.free[index].start {
            let this = self.free.remove(index);
            self.free[index - 1].end = this.end;
        }

        self.total_releases_counter += 1;
        tracing::info!("Released range at {:#x}", address);
    }
}
