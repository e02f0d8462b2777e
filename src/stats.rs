use serde::Serialize;

/// Access counters, mutated only by `Cache::access`. All monotonically
/// non-decreasing; `total_accesses == reads + writes` at all times.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct AccessStatistics {
    pub reads: u64,
    pub writes: u64,
    pub read_misses: u64,
    pub write_misses: u64,
    pub write_backs: u64,
    pub total_accesses: u64,
}

impl AccessStatistics {
    pub fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    pub fn hits(&self) -> u64 {
        self.total_accesses - self.misses()
    }

    pub fn miss_rate(&self) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            self.misses() as f64 / self.total_accesses as f64
        }
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            reads: self.reads,
            writes: self.writes,
            read_misses: self.read_misses,
            write_misses: self.write_misses,
            write_backs: self.write_backs,
            total_accesses: self.total_accesses,
            hits: self.hits(),
            misses: self.misses(),
            miss_rate: self.miss_rate(),
        }
    }
}

/// Counters plus derived rates, in the shape written to the JSON report.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub reads: u64,
    pub writes: u64,
    pub read_misses: u64,
    pub write_misses: u64,
    pub write_backs: u64,
    pub total_accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub miss_rate: f64,
}
