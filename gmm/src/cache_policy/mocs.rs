use {
    super::{CacheFlags, CachePolicyElement},
    crate::error::CachePolicyError,
    alloc::vec::Vec,
};

pub(crate) const CACHEABILITY_PTE: u8 = 0;
pub(crate) const CACHEABILITY_UC: u8 = 1;
pub(crate) const CACHEABILITY_WT: u8 = 2;
pub(crate) const CACHEABILITY_WB: u8 = 3;

pub(crate) const TARGET_ELLC: u8 = 0;
pub(crate) const TARGET_LLC: u8 = 1;
pub(crate) const TARGET_LLC_ELLC: u8 = 2;

/// LLC and eLLC control part of a MOCS entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeCcControl {
    /// 0 - from PTE, 1 - uncached, 2 - write-through, 3 - write-back.
    pub cacheability: u8,

    /// 0 - eLLC only, 1 - LLC only, 2 - LLC and eLLC.
    pub target_cache: u8,

    /// LRU age. `None` leaves age of the line unchanged.
    pub age: Option<u8>,

    pub no_aom: bool,
    pub self_snoop: bool,
}

impl LeCcControl {
    /// Register encoding:
    /// `[1:0]` cacheability, `[3:2]` target cache, `[5:4]` age,
    /// `[6]` keep age, `[7]` no allocate on miss, `[8]` self snoop.
    pub fn value(&self) -> u32 {
        let (age, keep) = match self.age {
            Some(age) => (u32::from(age & 3), 0),
            None => (0, 1),
        };

        u32::from(self.cacheability & 3)
            | u32::from(self.target_cache & 3) << 2
            | age << 4
            | keep << 6
            | u32::from(self.no_aom) << 7
            | u32::from(self.self_snoop) << 8
    }
}

/// L3 control part of a MOCS entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct L3Control {
    /// 1 - uncached, 3 - write-back.
    pub cacheability: u8,

    /// Also cache in HDC L1.
    pub hdc_l1: bool,

    /// Uncached writes are globally observable only in memory.
    pub go_mem: bool,
}

impl L3Control {
    /// Register encoding: `[5:4]` cacheability, `[8]` HDC L1, `[9]` GO at memory.
    pub fn value(&self) -> u32 {
        u32::from(self.cacheability & 3) << 4
            | u32::from(self.hdc_l1) << 8
            | u32::from(self.go_mem) << 9
    }

    #[inline]
    pub fn is_cached(&self) -> bool {
        self.cacheability == CACHEABILITY_WB
    }
}

/// Entry of MOCS table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MocsEntry {
    pub index: u32,
    pub lecc: LeCcControl,
    pub l3: L3Control,

    /// Reserved for specific usages and never picked by lookup.
    pub special: bool,
}

pub(crate) const fn lecc(cacheability: u8, age: Option<u8>) -> LeCcControl {
    LeCcControl {
        cacheability,
        target_cache: TARGET_LLC,
        age,
        no_aom: false,
        self_snoop: false,
    }
}

pub(crate) const fn l3(cached: bool) -> L3Control {
    L3Control {
        cacheability: if cached {
            CACHEABILITY_WB
        } else {
            CACHEABILITY_UC
        },
        hdc_l1: false,
        go_mem: false,
    }
}

/// Entry with index 0, reserved as uncached.
pub(crate) const UNCACHED_ENTRY: MocsEntry = MocsEntry {
    index: 0,
    lecc: lecc(CACHEABILITY_UC, Some(3)),
    l3: l3(false),
    special: true,
};

/// LeCC control requested by the element.
pub(crate) fn element_lecc(element: &CachePolicyElement) -> LeCcControl {
    let flags = element.flags;
    let llc = flags.contains(CacheFlags::LLC);
    let ellc = flags.contains(CacheFlags::ELLC);

    let cacheability = if !llc && !ellc {
        CACHEABILITY_UC
    } else if flags.contains(CacheFlags::WT) {
        CACHEABILITY_WT
    } else {
        CACHEABILITY_WB
    };

    let target_cache = match (llc, ellc) {
        (false, true) => TARGET_ELLC,
        (true, true) => TARGET_LLC_ELLC,
        _ => TARGET_LLC,
    };

    LeCcControl {
        cacheability,
        target_cache,
        age: Some(element.age),
        no_aom: flags.contains(CacheFlags::NO_AOM),
        self_snoop: flags.contains(CacheFlags::SSO),
    }
}

/// L3 control requested by the element.
pub(crate) fn element_l3(element: &CachePolicyElement) -> L3Control {
    L3Control {
        hdc_l1: element.flags.contains(CacheFlags::HDC_L1),
        go_mem: element.flags.contains(CacheFlags::GO_MEM),
        ..l3(element.flags.contains(CacheFlags::L3))
    }
}

/// Returns index of the first general entry accepted by `pred`.
pub(crate) fn lookup(table: &[MocsEntry], pred: impl Fn(&MocsEntry) -> bool) -> Option<u32> {
    table
        .iter()
        .find(|entry| !entry.special && pred(entry))
        .map(|entry| entry.index)
}

/// Returns index of the entry with the controls, adding new one if there is none.
/// Table may not grow beyond `limit` entries.
pub(crate) fn allocate(
    table: &mut Vec<MocsEntry>,
    element: &CachePolicyElement,
    limit: u32,
) -> Result<u32, CachePolicyError> {
    let lecc = element_lecc(element);
    let l3 = element_l3(element);

    if let Some(entry) = table
        .iter()
        .find(|entry| entry.lecc == lecc && entry.l3 == l3)
    {
        return Ok(entry.index);
    }

    let index = table.len() as u32;
    if index >= limit {
        return Err(CachePolicyError::TableExhausted(element.usage));
    }

    table.push(MocsEntry {
        index,
        lecc,
        l3,
        special: false,
    });
    Ok(index)
}

#[cfg(test)]
mod tests {
    use {super::*, alloc::vec, gmm_types::ResourceUsage};

    #[test]
    fn encodings() {
        assert_eq!(lecc(CACHEABILITY_WB, Some(3)).value(), 0b11_01_11);
        assert_eq!(lecc(CACHEABILITY_WB, None).value(), 0b100_01_11);
        assert_eq!(l3(true).value(), 0x30);
        assert_eq!(
            L3Control {
                hdc_l1: true,
                ..l3(false)
            }
            .value(),
            0x110
        );
    }

    #[test]
    fn allocation_dedups_and_exhausts() {
        let mut table = vec![UNCACHED_ENTRY];

        let texture = CachePolicyElement::new(ResourceUsage::Texture, CacheFlags::LLC | CacheFlags::L3);
        let buffer = CachePolicyElement::new(ResourceUsage::Buffer, CacheFlags::LLC | CacheFlags::L3);
        let staging = CachePolicyElement::new(ResourceUsage::Staging, CacheFlags::LLC);

        assert_eq!(allocate(&mut table, &texture, 3), Ok(1));
        assert_eq!(allocate(&mut table, &buffer, 3), Ok(1));
        assert_eq!(allocate(&mut table, &staging, 3), Ok(2));
        assert_eq!(table.len(), 3);

        let mut aged = staging;
        aged.age = 0;
        assert_eq!(
            allocate(&mut table, &aged, 3),
            Err(CachePolicyError::TableExhausted(ResourceUsage::Staging))
        );
    }

    #[test]
    fn uncached_request_reuses_reserved_entry() {
        let mut table = vec![UNCACHED_ENTRY];
        let uncached = CachePolicyElement::new(ResourceUsage::Uncached, CacheFlags::empty());
        assert_eq!(allocate(&mut table, &uncached, 62), Ok(0));
    }
}
