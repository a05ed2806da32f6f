//! Cache Entry Module
//!
//! Defines the structure for a resident block and its access metadata.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A resident block with access metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The cached bytes, exactly one block long
    pub data: Vec<u8>,
    /// Last access timestamp (Unix seconds)
    pub last_access: f64,
    /// Hit counter, seeded at insertion and carried forward on hits
    pub hit_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a freshly inserted entry.
    ///
    /// # Arguments
    /// * `data` - The block bytes
    /// * `now` - Insertion time in Unix seconds
    pub fn new(data: Vec<u8>, now: f64) -> Self {
        Self {
            data,
            last_access: now,
            hit_count: 1,
        }
    }

    // == Touch ==
    /// Refreshes the last access time. The hit counter is left as is.
    pub fn touch(&mut self, now: f64) {
        self.last_access = now;
    }

    // == Length ==
    /// Returns the byte length of the cached data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // == Idle Time ==
    /// Seconds elapsed since the last access, never negative.
    pub fn idle_secs(&self, now: f64) -> f64 {
        (now - self.last_access).max(0.0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in seconds.
pub fn current_timestamp_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
