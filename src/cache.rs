use std::ops::Range;

use crate::{
    addr::Geometry,
    config::{CacheConfig, ConfigError},
    event::{AccessEvent, Observer, Op},
    replace::{lru::Lru, Replace},
    stats::AccessStatistics,
};

/// State of one storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Invalid,
    Clean,
    Dirty,
}

/// One slot of the set/way grid.
///
/// While `status` is `Invalid` the tag is meaningless and never compared.
/// A line leaves `Invalid` only through a miss-fill and never returns to it;
/// the grid is fixed for the lifetime of the cache.
#[derive(Debug, Clone)]
pub struct CacheLine {
    pub tag: u32,
    /// Value of `total_accesses` when this line was last touched.
    pub last_access: u64,
    pub status: LineStatus,
    pub set: usize,
    pub way: usize,
}

impl CacheLine {
    pub(crate) fn new(set: usize, way: usize) -> Self {
        CacheLine {
            tag: 0,
            last_access: 0,
            status: LineStatus::Invalid,
            set,
            way,
        }
    }
}

/// A set-associative cache model with LRU replacement and a
/// write-back/write-allocate write policy.
///
/// Tracks line metadata and counters only; no data bytes are stored or
/// moved. Single-threaded: one accessor drives the simulation, and separate
/// traces need separate instances.
pub struct Cache<R: Replace = Lru> {
    geom: Geometry,
    // Row-major by set: lines[set * associativity + way].
    lines: Vec<CacheLine>,
    stats: AccessStatistics,
    repl: R,
    observer: Box<dyn Observer>,
}

impl Cache<Lru> {
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Cache::with_policy(config, Lru)
    }
}

impl<R: Replace> Cache<R> {
    pub fn with_policy(config: &CacheConfig, repl: R) -> Result<Self, ConfigError> {
        let geom = config.geometry()?;
        let mut lines = Vec::with_capacity(geom.num_sets * geom.associativity);
        for set in 0..geom.num_sets {
            for way in 0..geom.associativity {
                lines.push(CacheLine::new(set, way));
            }
        }
        Ok(Cache {
            geom,
            lines,
            stats: AccessStatistics::default(),
            repl,
            observer: Box::new(|_: &AccessEvent<'_>| {}),
        })
    }

    /// Registers the per-access observer, replacing the no-op default.
    pub fn set_observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Box::new(observer);
    }

    /// Processes one memory access and notifies the observer.
    ///
    /// Any 32-bit value is a valid address; there are no per-access errors.
    pub fn access(&mut self, addr: u32, op: Op) {
        self.stats.total_accesses += 1;
        match op {
            Op::Read => self.stats.reads += 1,
            Op::Write => self.stats.writes += 1,
        }

        let tag = self.geom.tag_of(addr);
        let index = self.geom.index_of(addr);
        let set = self.set_range(index);

        // Full scan, no early exit: with duplicate tags (impossible by
        // construction) the last matching way would win.
        let mut hit_way = None;
        for (way, line) in self.lines[set.clone()].iter().enumerate() {
            if line.status != LineStatus::Invalid && line.tag == tag {
                hit_way = Some(way);
            }
        }

        let touched = match hit_way {
            Some(way) => {
                let line = &mut self.lines[set.start + way];
                line.last_access = self.stats.total_accesses;
                // A read hit changes nothing else.
                if op == Op::Write {
                    line.status = LineStatus::Dirty;
                }
                set.start + way
            }
            None => {
                let way = self
                    .repl
                    .victim(&self.lines[set.clone()], self.stats.total_accesses);
                let line = &mut self.lines[set.start + way];
                if line.status == LineStatus::Dirty {
                    // Bookkeeping only; no data is transferred.
                    self.stats.write_backs += 1;
                }
                line.tag = tag;
                line.last_access = self.stats.total_accesses;
                match op {
                    Op::Read => {
                        self.stats.read_misses += 1;
                        line.status = LineStatus::Clean;
                    }
                    Op::Write => {
                        self.stats.write_misses += 1;
                        line.status = LineStatus::Dirty;
                    }
                }
                set.start + way
            }
        };

        let event = AccessEvent {
            op,
            hit: hit_way.is_some(),
            tag,
            index,
            offset: self.geom.offset_of(addr),
            tag_bits: self.geom.tag_bits,
            index_bits: self.geom.index_bits,
            offset_bits: self.geom.offset_bits,
            line: &self.lines[touched],
        };
        self.observer.on_access(&event);
    }

    fn set_range(&self, index: usize) -> Range<usize> {
        index * self.geom.associativity..(index + 1) * self.geom.associativity
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    pub fn stats(&self) -> &AccessStatistics {
        &self.stats
    }

    pub fn line(&self, set: usize, way: usize) -> &CacheLine {
        &self.lines[set * self.geom.associativity + way]
    }

    pub fn tag_bits(&self) -> u32 {
        self.geom.tag_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.geom.index_bits
    }

    pub fn offset_bits(&self) -> u32 {
        self.geom.offset_bits
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn cache_1k() -> Cache {
        Cache::new(&CacheConfig {
            total_size_bytes: 1024,
            associativity: 4,
            block_size_bytes: 32,
        })
        .unwrap()
    }

    // One set, two ways, 16-byte blocks: tags are addr >> 4.
    fn tiny_cache() -> Cache {
        Cache::new(&CacheConfig {
            total_size_bytes: 32,
            associativity: 2,
            block_size_bytes: 16,
        })
        .unwrap()
    }

    #[test]
    fn exposes_bit_widths() {
        let cache = cache_1k();
        assert_eq!(cache.tag_bits(), 24);
        assert_eq!(cache.index_bits(), 3);
        assert_eq!(cache.offset_bits(), 5);
    }

    #[test]
    fn first_access_always_misses() {
        let mut cache = cache_1k();
        cache.access(0x1000, Op::Read);
        assert_eq!(cache.stats().reads, 1);
        assert_eq!(cache.stats().read_misses, 1);
        assert_eq!(cache.stats().total_accesses, 1);
    }

    #[test]
    fn repeat_access_hits() {
        let mut cache = cache_1k();
        cache.access(0x1000, Op::Read);
        cache.access(0x1000, Op::Read);
        assert_eq!(cache.stats().reads, 2);
        assert_eq!(cache.stats().read_misses, 1);
        assert_eq!(cache.stats().hits(), 1);
    }

    #[test]
    fn write_hit_dirties_a_clean_line() {
        let mut cache = cache_1k();
        cache.access(0x1000, Op::Read);
        assert_eq!(cache.line(0, 0).status, LineStatus::Clean);
        cache.access(0x1000, Op::Write);
        assert_eq!(cache.line(0, 0).status, LineStatus::Dirty);
        assert_eq!(cache.stats().write_misses, 0);
    }

    #[test]
    fn read_hit_leaves_a_dirty_line_dirty() {
        let mut cache = cache_1k();
        cache.access(0x1000, Op::Write);
        cache.access(0x1000, Op::Read);
        assert_eq!(cache.line(0, 0).status, LineStatus::Dirty);
    }

    #[test]
    fn evicts_the_least_recently_used_line() {
        let mut cache = tiny_cache();
        let (a, b, c) = (0x000, 0x100, 0x200);
        cache.access(a, Op::Read); // fills way 0
        cache.access(b, Op::Read); // fills way 1
        cache.access(a, Op::Read); // refreshes A
        cache.access(c, Op::Read); // must evict B
        assert_eq!(cache.line(0, 0).tag, 0x00);
        assert_eq!(cache.line(0, 1).tag, 0x20);
        assert_eq!(cache.stats().read_misses, 3);
    }

    #[test]
    fn evicting_a_dirty_line_counts_one_write_back() {
        let mut cache = tiny_cache();
        cache.access(0x000, Op::Write);
        cache.access(0x100, Op::Write);
        cache.access(0x200, Op::Read); // evicts dirty 0x000
        assert_eq!(cache.stats().write_backs, 1);
        assert_eq!(cache.stats().read_misses, 1);
        assert_eq!(cache.stats().write_misses, 2);
        assert_eq!(cache.line(0, 0).tag, 0x20);
        assert_eq!(cache.line(0, 0).status, LineStatus::Clean);
    }

    #[test]
    fn evicting_a_clean_line_does_not() {
        let mut cache = tiny_cache();
        cache.access(0x000, Op::Read);
        cache.access(0x100, Op::Read);
        cache.access(0x200, Op::Read);
        assert_eq!(cache.stats().write_backs, 0);
    }

    #[test]
    fn counters_stay_consistent() {
        let mut cache = tiny_cache();
        for i in 0..64u32 {
            let addr = (i * 40) & 0xfff;
            let op = if i % 3 == 0 { Op::Write } else { Op::Read };
            cache.access(addr, op);
            let stats = cache.stats();
            assert_eq!(stats.total_accesses, stats.reads + stats.writes);
            assert!(stats.misses() <= stats.total_accesses);
        }
    }

    #[test]
    fn observer_sees_every_access() {
        let seen: Rc<RefCell<Vec<(Op, bool, u32, usize, usize)>>> = Rc::default();
        let log = Rc::clone(&seen);
        let mut cache = cache_1k();
        cache.set_observer(move |event: &AccessEvent<'_>| {
            log.borrow_mut()
                .push((event.op, event.hit, event.tag, event.index, event.line.way));
        });

        cache.access(0x1234, Op::Read);
        cache.access(0x1234, Op::Write);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Op::Read, false, 0x12, 1, 0));
        assert_eq!(seen[1], (Op::Write, true, 0x12, 1, 0));
    }

    #[test]
    fn event_carries_the_field_widths() {
        let widths = Rc::new(RefCell::new((0u32, 0u32, 0u32)));
        let out = Rc::clone(&widths);
        let mut cache = cache_1k();
        cache.set_observer(move |event: &AccessEvent<'_>| {
            *out.borrow_mut() = (event.tag_bits, event.index_bits, event.offset_bits);
        });
        cache.access(0xdead_beef, Op::Write);
        assert_eq!(*widths.borrow(), (24, 3, 5));
    }
}
