use serde::Deserialize;
use thiserror::Error;

use crate::addr::{Geometry, ADDRESS_BITS};

/// Cache dimensions as supplied by the caller, typically deserialized from a
/// JSON config.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub total_size_bytes: usize,
    pub associativity: usize,
    pub block_size_bytes: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cache dimensions must all be positive")]
    ZeroDimension,
    #[error("total size {total} is not divisible by block size {block} x associativity {ways}")]
    NotDivisible {
        total: usize,
        block: usize,
        ways: usize,
    },
    #[error("block size {0} must be a power of two")]
    BlockNotPowerOfTwo(usize),
    #[error("number of sets {0} must be a power of two")]
    SetsNotPowerOfTwo(usize),
    #[error("index and offset fields need {0} bits, more than the {ADDRESS_BITS}-bit address")]
    AddressTooNarrow(u32),
}

impl CacheConfig {
    /// Validates the dimensions and derives the bit widths used for address
    /// decomposition. The only fallible step in building a cache.
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        if self.total_size_bytes == 0 || self.associativity == 0 || self.block_size_bytes == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        if !self.block_size_bytes.is_power_of_two() {
            return Err(ConfigError::BlockNotPowerOfTwo(self.block_size_bytes));
        }
        let set_bytes = self.block_size_bytes * self.associativity;
        if self.total_size_bytes % set_bytes != 0 {
            return Err(ConfigError::NotDivisible {
                total: self.total_size_bytes,
                block: self.block_size_bytes,
                ways: self.associativity,
            });
        }
        let num_sets = self.total_size_bytes / set_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetsNotPowerOfTwo(num_sets));
        }

        let offset_bits = self.block_size_bytes.ilog2();
        let index_bits = num_sets.ilog2();
        if offset_bits + index_bits > ADDRESS_BITS {
            return Err(ConfigError::AddressTooNarrow(offset_bits + index_bits));
        }

        Ok(Geometry {
            total_size_bytes: self.total_size_bytes,
            associativity: self.associativity,
            block_size_bytes: self.block_size_bytes,
            num_sets,
            offset_bits,
            index_bits,
            tag_bits: ADDRESS_BITS - index_bits - offset_bits,
        })
    }
}
