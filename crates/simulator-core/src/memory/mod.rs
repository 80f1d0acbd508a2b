//! Word-addressed memory image and the protection policy over it.

/// Fetch/data access validation against the fixed region map.
pub mod access;
/// The fixed four-region address-space map.
pub mod map;

pub use access::{validate_data_access, validate_fetch_access};
pub use map::{region_of, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS};

/// Number of 16-bit words in the flat memory image.
pub const MEMORY_WORDS: usize = u16::MAX as usize + 1;

/// Allocates a zero-filled 64 Ki-word memory image.
#[must_use]
pub fn new_memory_image() -> Box<[u16]> {
    vec![0_u16; MEMORY_WORDS].into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::{new_memory_image, MEMORY_WORDS};

    #[test]
    fn image_covers_every_sixteen_bit_address() {
        let image = new_memory_image();
        assert_eq!(image.len(), MEMORY_WORDS);
        assert!(image.iter().all(|&word| word == 0));
    }
}
