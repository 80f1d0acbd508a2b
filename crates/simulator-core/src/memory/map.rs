/// The four architectural regions of the 16-bit address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryRegion {
    /// `0x0000..=0x1FFF`, executable user text.
    UserCode,
    /// `0x2000..=0x7FFF`, user data, never executable.
    UserData,
    /// `0x8000..=0x9FFF`, operating-system text, never data-addressable.
    OsCode,
    /// `0xA000..=0xFFFF`, operating-system data, privileged access only.
    OsData,
}

/// One contiguous entry of the fixed address-space map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// First word address inside the region.
    pub start: u16,
    /// Last word address inside the region (inclusive).
    pub end: u16,
    /// Which architectural region this span belongs to.
    pub region: MemoryRegion,
}

impl RegionDescriptor {
    /// Returns `true` when `addr` falls inside this span.
    #[must_use]
    pub const fn contains(&self, addr: u16) -> bool {
        self.start <= addr && addr <= self.end
    }
}

/// The fixed address-space map, in ascending address order.
///
/// The map is total: every 16-bit address belongs to exactly one region.
pub const FIXED_MEMORY_REGIONS: [RegionDescriptor; 4] = [
    RegionDescriptor {
        start: 0x0000,
        end: 0x1FFF,
        region: MemoryRegion::UserCode,
    },
    RegionDescriptor {
        start: 0x2000,
        end: 0x7FFF,
        region: MemoryRegion::UserData,
    },
    RegionDescriptor {
        start: 0x8000,
        end: 0x9FFF,
        region: MemoryRegion::OsCode,
    },
    RegionDescriptor {
        start: 0xA000,
        end: 0xFFFF,
        region: MemoryRegion::OsData,
    },
];

const _: () = assert_contiguous_coverage();

const fn assert_contiguous_coverage() {
    assert!(FIXED_MEMORY_REGIONS[0].start == 0x0000);
    assert!(FIXED_MEMORY_REGIONS[3].end == 0xFFFF);

    let mut i = 1;
    while i < FIXED_MEMORY_REGIONS.len() {
        assert!(FIXED_MEMORY_REGIONS[i].start == FIXED_MEMORY_REGIONS[i - 1].end + 1);
        i += 1;
    }
}

/// Classifies a word address into its architectural region.
#[must_use]
pub const fn region_of(addr: u16) -> MemoryRegion {
    let mut i = 0;
    while i < FIXED_MEMORY_REGIONS.len() {
        if FIXED_MEMORY_REGIONS[i].contains(addr) {
            return FIXED_MEMORY_REGIONS[i].region;
        }
        i += 1;
    }
    // Unreachable: the map is total over u16, checked at compile time.
    MemoryRegion::OsData
}
