//! Frequency+Recency Policy
//!
//! Score is the insertion count plus an inverse-elapsed-time recency term.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheKey};

use super::{lowest_scored, EvictionPolicy};

/// Default divisor applied to large-block scores.
pub const DEFAULT_LARGE_DIVISOR: f64 = 2.0;

// == Frequency Recency Policy ==
#[derive(Debug)]
pub struct FrequencyRecencyPolicy {
    /// Both maps outlive eviction unless the key is forgotten
    frequency: HashMap<CacheKey, u64>,
    last_access: HashMap<CacheKey, f64>,
    large_divisor: f64,
}

impl FrequencyRecencyPolicy {
    pub fn new() -> Self {
        Self::with_large_divisor(DEFAULT_LARGE_DIVISOR)
    }

    pub fn with_large_divisor(large_divisor: f64) -> Self {
        Self {
            frequency: HashMap::new(),
            last_access: HashMap::new(),
            large_divisor,
        }
    }

    pub fn frequency(&self, key: &CacheKey) -> u64 {
        self.frequency.get(key).copied().unwrap_or(0)
    }

    // == Recency Term ==
    /// 1 when accessed this very instant, 0 when never recorded,
    /// otherwise `1 / elapsed_seconds`.
    fn recency(&self, key: &CacheKey, now: f64) -> f64 {
        match self.last_access.get(key) {
            Some(last) if now - last == 0.0 => 1.0,
            Some(last) => 1.0 / (now - last),
            None => 0.0,
        }
    }

    // == Score ==
    pub fn score(&self, key: &CacheKey, now: f64) -> f64 {
        let combined = self.frequency(key) as f64 + self.recency(key, now);
        if key.size.is_large() {
            combined / self.large_divisor
        } else {
            combined
        }
    }
}

impl Default for FrequencyRecencyPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl EvictionPolicy for FrequencyRecencyPolicy {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn record_access(&mut self, key: &CacheKey, now: f64) {
        *self.frequency.entry(*key).or_insert(0) += 1;
        self.last_access.insert(*key, now);
    }

    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        now: f64,
    ) -> Option<CacheKey> {
        lowest_scored(
            self.frequency
                .keys()
                .filter(|key| entries.contains_key(key))
                .map(|key| (*key, self.score(key, now))),
        )
    }

    fn forget(&mut self, key: &CacheKey) {
        self.frequency.remove(key);
        self.last_access.remove(key);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::BlockSize;

    fn resident(keys: &[CacheKey]) -> HashMap<CacheKey, CacheEntry> {
        keys.iter()
            .map(|k| (*k, CacheEntry::new(vec![0; k.byte_len()], 0.0)))
            .collect()
    }

    #[test]
    fn test_record_access_counts() {
        let mut policy = FrequencyRecencyPolicy::new();
        let key = CacheKey::new(0, BlockSize::Small);

        policy.record_access(&key, 10.0);
        policy.record_access(&key, 11.0);
        policy.record_access(&key, 12.0);

        assert_eq!(policy.frequency(&key), 3);
    }

    #[test]
    fn test_recency_term() {
        let mut policy = FrequencyRecencyPolicy::new();
        let key = CacheKey::new(0, BlockSize::Small);
        policy.record_access(&key, 100.0);

        // Same instant
        assert_eq!(policy.score(&key, 100.0), 2.0);
        // Four seconds later
        assert_eq!(policy.score(&key, 104.0), 1.25);
        // Never recorded
        assert_eq!(policy.score(&CacheKey::new(8, BlockSize::Small), 104.0), 0.0);
    }

    #[test]
    fn test_large_score_divided() {
        let mut policy = FrequencyRecencyPolicy::new();
        let key = CacheKey::new(0, BlockSize::Large);
        policy.record_access(&key, 100.0);

        assert_eq!(policy.score(&key, 104.0), 1.25 / 2.0);
    }

    #[test]
    fn test_custom_large_divisor() {
        let mut policy = FrequencyRecencyPolicy::with_large_divisor(8.0);
        let key = CacheKey::new(0, BlockSize::Large);
        policy.record_access(&key, 100.0);

        assert_eq!(policy.score(&key, 100.0), 2.0 / 8.0);
    }

    #[test]
    fn test_least_frequent_is_victim() {
        let mut policy = FrequencyRecencyPolicy::new();
        let busy = CacheKey::new(0, BlockSize::Small);
        let idle = CacheKey::new(8, BlockSize::Small);

        for t in [100.0, 101.0, 102.0] {
            policy.record_access(&busy, t);
        }
        policy.record_access(&idle, 102.0);

        let entries = resident(&[busy, idle]);
        assert_eq!(policy.choose_victim(&entries, 110.0), Some(idle));
    }

    #[test]
    fn test_empty_state_no_victim() {
        let mut policy = FrequencyRecencyPolicy::new();
        let entries = resident(&[CacheKey::new(0, BlockSize::Small)]);
        assert_eq!(policy.choose_victim(&entries, 100.0), None);
    }

    #[test]
    fn test_forget_resets_frequency() {
        let mut policy = FrequencyRecencyPolicy::new();
        let key = CacheKey::new(0, BlockSize::Small);
        policy.record_access(&key, 10.0);
        policy.record_access(&key, 11.0);

        policy.forget(&key);

        assert_eq!(policy.frequency(&key), 0);
        assert_eq!(policy.score(&key, 12.0), 0.0);
    }
}
