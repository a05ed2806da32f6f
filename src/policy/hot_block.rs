//! Hot Block Policy
//!
//! Keeps a hotness counter per key, bumped on every selection for each
//! resident key accessed within the threshold window. The victim is the
//! key with the highest counter, so the hottest tracked block goes first.

use std::collections::HashMap;

use tracing::trace;

use crate::cache::{CacheEntry, CacheKey};

use super::EvictionPolicy;

// == Hot Block Policy ==
#[derive(Debug)]
pub struct HotBlockPolicy {
    /// Seconds since last access within which a block counts as hot
    threshold: f64,
    /// Kept for evicted keys unless forgotten
    hotness: HashMap<CacheKey, u64>,
}

impl HotBlockPolicy {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            hotness: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn hotness(&self, key: &CacheKey) -> u64 {
        self.hotness.get(key).copied().unwrap_or(0)
    }
}

impl Default for HotBlockPolicy {
    fn default() -> Self {
        Self::new(super::DEFAULT_HOT_BLOCK_THRESHOLD)
    }
}

impl EvictionPolicy for HotBlockPolicy {
    fn name(&self) -> &'static str {
        "hot-block"
    }

    fn record_access(&mut self, _key: &CacheKey, _now: f64) {}

    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        now: f64,
    ) -> Option<CacheKey> {
        for (key, entry) in entries {
            if entry.idle_secs(now) < self.threshold {
                *self.hotness.entry(*key).or_insert(0) += 1;
            }
        }

        // Strictly above zero, so an untouched counter never wins.
        // Departed keys keep their counters unless forgotten.
        let mut victim = None;
        let mut hottest = 0;
        for (key, &score) in &self.hotness {
            if score > hottest && entries.contains_key(key) {
                victim = Some(*key);
                hottest = score;
            }
        }

        trace!(?victim, hottest, "Hot block selection");
        victim
    }

    fn forget(&mut self, key: &CacheKey) {
        self.hotness.remove(key);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BlockSize;

    fn small(offset: u64) -> CacheKey {
        CacheKey::new(offset, BlockSize::Small)
    }

    #[test]
    fn test_hottest_key_is_evicted() {
        let mut policy = HotBlockPolicy::new(10.0);
        let mut entries = HashMap::new();
        entries.insert(small(0), CacheEntry::new(vec![0; 8], 995.0));
        entries.insert(small(8), CacheEntry::new(vec![0; 8], 100.0));

        assert_eq!(policy.choose_victim(&entries, 1000.0), Some(small(0)));
        assert_eq!(policy.hotness(&small(0)), 1);
        assert_eq!(policy.hotness(&small(8)), 0);
    }

    #[test]
    fn test_no_hot_blocks_no_victim() {
        let mut policy = HotBlockPolicy::new(10.0);
        let mut entries = HashMap::new();
        entries.insert(small(0), CacheEntry::new(vec![0; 8], 100.0));

        assert_eq!(policy.choose_victim(&entries, 1000.0), None);
    }

    #[test]
    fn test_counters_accumulate_across_selections() {
        let mut policy = HotBlockPolicy::new(10.0);
        let mut entries = HashMap::new();
        entries.insert(small(0), CacheEntry::new(vec![0; 8], 1000.0));

        policy.choose_victim(&entries, 1001.0);
        policy.choose_victim(&entries, 1002.0);
        entries.insert(small(8), CacheEntry::new(vec![0; 8], 1002.0));

        // 0 has been hot three times, 8 only once
        assert_eq!(policy.choose_victim(&entries, 1003.0), Some(small(0)));
        assert_eq!(policy.hotness(&small(0)), 3);
        assert_eq!(policy.hotness(&small(8)), 1);
    }

    #[test]
    fn test_departed_keys_are_not_chosen() {
        let mut policy = HotBlockPolicy::new(10.0);
        let mut entries = HashMap::new();
        entries.insert(small(0), CacheEntry::new(vec![0; 8], 1000.0));
        policy.choose_victim(&entries, 1000.0);
        policy.choose_victim(&entries, 1000.0);

        entries.clear();
        entries.insert(small(8), CacheEntry::new(vec![0; 8], 1000.0));

        assert_eq!(policy.choose_victim(&entries, 1000.0), Some(small(8)));
    }

    #[test]
    fn test_forget_resets_hotness() {
        let mut policy = HotBlockPolicy::new(10.0);
        let mut entries = HashMap::new();
        entries.insert(small(0), CacheEntry::new(vec![0; 8], 1000.0));
        policy.choose_victim(&entries, 1000.0);
        policy.choose_victim(&entries, 1000.0);

        policy.forget(&small(0));

        assert_eq!(policy.hotness(&small(0)), 0);
    }
}
