//! Naive Least-Frequently-Used Policy
//!
//! Counts how many victim selections each key has survived while resident,
//! not how often it was read. Every `choose_victim` call bumps the counter
//! of every resident key, then evicts the lowest.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheKey};

use super::EvictionPolicy;

// == Naive LFU Policy ==
#[derive(Debug, Default)]
pub struct NaiveLfuPolicy {
    /// Kept for evicted keys unless forgotten
    counts: HashMap<CacheKey, u64>,
}

impl NaiveLfuPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, key: &CacheKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

impl EvictionPolicy for NaiveLfuPolicy {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn record_access(&mut self, _key: &CacheKey, _now: f64) {}

    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        _now: f64,
    ) -> Option<CacheKey> {
        for key in entries.keys() {
            *self.counts.entry(*key).or_insert(0) += 1;
        }

        entries
            .keys()
            .min_by_key(|key| self.count(key))
            .copied()
    }

    fn forget(&mut self, key: &CacheKey) {
        self.counts.remove(key);
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

    fn resident(keys: &[CacheKey]) -> HashMap<CacheKey, CacheEntry> {
        keys.iter()
            .map(|k| (*k, CacheEntry::new(vec![0; 8], 0.0)))
            .collect()
    }

    #[test]
    fn test_selection_bumps_every_resident_counter() {
        let mut policy = NaiveLfuPolicy::new();
        let entries = resident(&[small(0), small(8)]);

        policy.choose_victim(&entries, 0.0);
        policy.choose_victim(&entries, 0.0);

        assert_eq!(policy.count(&small(0)), 2);
        assert_eq!(policy.count(&small(8)), 2);
        assert_eq!(policy.count(&small(16)), 0);
    }

    #[test]
    fn test_newcomer_is_victim() {
        let mut policy = NaiveLfuPolicy::new();

        // Survives two selections
        policy.choose_victim(&resident(&[small(0)]), 0.0);
        policy.choose_victim(&resident(&[small(0)]), 0.0);

        let victim = policy.choose_victim(&resident(&[small(0), small(8)]), 0.0);
        assert_eq!(victim, Some(small(8)));
        assert_eq!(policy.count(&small(0)), 3);
        assert_eq!(policy.count(&small(8)), 1);
    }

    #[test]
    fn test_record_access_is_ignored() {
        let mut policy = NaiveLfuPolicy::new();
        policy.record_access(&small(0), 0.0);
        assert_eq!(policy.count(&small(0)), 0);
    }

    #[test]
    fn test_empty_no_victim() {
        let mut policy = NaiveLfuPolicy::new();
        assert_eq!(policy.choose_victim(&HashMap::new(), 0.0), None);
    }

    #[test]
    fn test_forget_resets_count() {
        let mut policy = NaiveLfuPolicy::new();
        let entries = resident(&[small(0), small(8)]);
        policy.choose_victim(&entries, 0.0);
        policy.choose_victim(&entries, 0.0);

        policy.forget(&small(0));

        assert_eq!(policy.count(&small(0)), 0);
        assert_eq!(policy.choose_victim(&entries, 0.0), Some(small(0)));
    }
}
