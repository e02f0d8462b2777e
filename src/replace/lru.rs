use crate::cache::{CacheLine, LineStatus};

use super::Replace;

/// Least-recently-used replacement.
pub struct Lru;

impl Replace for Lru {
    fn victim(&mut self, set: &[CacheLine], total_accesses: u64) -> usize {
        // An invalid line is always preferred over an eviction.
        for (way, line) in set.iter().enumerate() {
            if line.status == LineStatus::Invalid {
                return way;
            }
        }

        // Single forward scan for the smallest last_access. The seed is the
        // current access count, which every resident line is older than, and
        // the comparison is `<=`: on equal recency the later way wins.
        let mut victim = 0;
        let mut oldest = total_accesses;
        for (way, line) in set.iter().enumerate() {
            if line.last_access <= oldest {
                victim = way;
                oldest = line.last_access;
            }
        }
        victim
    }
}
