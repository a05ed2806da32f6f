//! Decayed-Recency Policy
//!
//! Scores each key from its last few access times, weighting them with an
//! exponential decay. Large blocks score lower because they can be rebuilt
//! from small ones by coalescing.

use std::collections::{HashMap, VecDeque};

use crate::cache::{CacheEntry, CacheKey, BLOCKS_PER_LARGE};

use super::{lowest_scored, EvictionPolicy};

/// Access times remembered per key.
pub const MAX_RECENT_ACCESSES: usize = 10;

// == Decayed Recency Policy ==
#[derive(Debug)]
pub struct DecayedRecencyPolicy {
    /// Oldest access first, at most `MAX_RECENT_ACCESSES` long.
    /// Outlives eviction unless forgotten.
    recent: HashMap<CacheKey, VecDeque<f64>>,
    decay_factor: f64,
}

impl DecayedRecencyPolicy {
    pub fn new(decay_factor: f64) -> Self {
        Self {
            recent: HashMap::new(),
            decay_factor,
        }
    }

    pub fn decay_factor(&self) -> f64 {
        self.decay_factor
    }

    /// Recorded access times for `key`, oldest first.
    pub fn accesses(&self, key: &CacheKey) -> Option<&VecDeque<f64>> {
        self.recent.get(key)
    }

    // == Score ==
    /// `1 / (2·now − Σ tᵢ·dⁱ)` with `i` counted from the oldest access.
    ///
    /// Zero for an empty queue; divided by the blocks-per-large ratio for
    /// large keys.
    pub fn score(&self, key: &CacheKey, now: f64) -> f64 {
        let score = match self.recent.get(key) {
            Some(times) if !times.is_empty() => {
                let (weighted, _) = times
                    .iter()
                    .fold((0.0, 1.0), |(sum, weight), t| {
                        (sum + t * weight, weight * self.decay_factor)
                    });
                1.0 / (2.0 * now - weighted)
            }
            _ => 0.0,
        };

        if key.size.is_large() {
            score / BLOCKS_PER_LARGE as f64
        } else {
            score
        }
    }
}

impl Default for DecayedRecencyPolicy {
    fn default() -> Self {
        Self::new(super::DEFAULT_DECAY_FACTOR)
    }
}

impl EvictionPolicy for DecayedRecencyPolicy {
    fn name(&self) -> &'static str {
        "decay"
    }

    fn record_access(&mut self, key: &CacheKey, now: f64) {
        let times = self
            .recent
            .entry(*key)
            .or_insert_with(|| VecDeque::with_capacity(MAX_RECENT_ACCESSES));
        if times.len() == MAX_RECENT_ACCESSES {
            times.pop_front();
        }
        times.push_back(now);
    }

    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        now: f64,
    ) -> Option<CacheKey> {
        lowest_scored(
            self.recent
                .keys()
                .filter(|key| entries.contains_key(key))
                .map(|key| (*key, self.score(key, now))),
        )
    }

    fn forget(&mut self, key: &CacheKey) {
        self.recent.remove(key);
    }
}
