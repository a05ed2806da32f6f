//! Cache Statistics Module
//!
//! Request outcome counters for one cache store. A coalesced large read is
//! a hit that never touched the backing store, so it is counted twice:
//! once in `hits` and once in `coalesced_hits`.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of request outcomes and occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests served from the cache, coalesced ones included
    pub hits: u64,
    /// Requests that went to the backing store
    pub misses: u64,
    /// Large requests rebuilt from resident small blocks
    pub coalesced_hits: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Resident entries at snapshot time
    pub total_entries: usize,
    /// Resident bytes at snapshot time
    pub current_size: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests answered so far, hit or miss.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    // == Ratios ==
    /// Share of requests served without a backing read; 0.0 before any.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.requests())
    }

    /// Share of hits that came from coalescing; 0.0 before any hit.
    pub fn coalesced_share(&self) -> f64 {
        ratio(self.coalesced_hits, self.hits)
    }

    // == Recording ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_coalesced_hit(&mut self) {
        self.hits += 1;
        self.coalesced_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Stamps resident counts onto a snapshot.
    pub fn set_occupancy(&mut self, total_entries: usize, current_size: usize) {
        self.total_entries = total_entries;
        self.current_size = current_size;
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
