//! Least-Recently-Used Policy
//!
//! Evicts the entry with the oldest last access time. Entries already carry
//! their access times, so there is no separate bookkeeping.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheKey};

use super::{lowest_scored, EvictionPolicy};

// == LRU Policy ==
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl EvictionPolicy for LruPolicy {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn record_access(&mut self, _key: &CacheKey, _now: f64) {}

    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        _now: f64,
    ) -> Option<CacheKey> {
        lowest_scored(entries.iter().map(|(key, entry)| (*key, entry.last_access)))
    }
}
