pub mod lru;

use crate::cache::CacheLine;

/// Victim selection for a miss-fill.
///
/// Given the lines of one set (in way order) and the cache's current access
/// count, returns the way to overwrite. Guaranteed to succeed for any
/// non-empty set.
pub trait Replace {
    fn victim(&mut self, set: &[CacheLine], total_accesses: u64) -> usize;
}
