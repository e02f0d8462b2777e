//! Address decomposition.
//!
//! A 32-bit address splits into `| tag | index | offset |`, with the field
//! widths fixed by the cache geometry at construction time.

/// Addresses are treated as fixed-width 32-bit unsigned integers.
pub const ADDRESS_BITS: u32 = 32;

/// Derived cache geometry, computed once by [`CacheConfig::geometry`] and
/// owned by the cache for the lifetime of the run.
///
/// [`CacheConfig::geometry`]: crate::config::CacheConfig::geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub total_size_bytes: usize,
    pub associativity: usize,
    pub block_size_bytes: usize,
    pub num_sets: usize,
    pub offset_bits: u32,
    pub index_bits: u32,
    pub tag_bits: u32,
}

impl Geometry {
    /// Address bits above the index and offset fields.
    pub fn tag_of(&self, addr: u32) -> u32 {
        // Widen first: the shift equals ADDRESS_BITS when tag_bits == 0.
        ((addr as u64) >> (self.index_bits + self.offset_bits)) as u32
    }

    /// Set selector: shift out the offset, mask with `num_sets - 1`.
    /// Valid because `num_sets` is a power of two.
    pub fn index_of(&self, addr: u32) -> usize {
        ((addr as u64) >> self.offset_bits) as usize & (self.num_sets - 1)
    }

    /// Byte position within the block. Valid because `block_size_bytes` is a
    /// power of two.
    pub fn offset_of(&self, addr: u32) -> usize {
        addr as usize & (self.block_size_bytes - 1)
    }
}
