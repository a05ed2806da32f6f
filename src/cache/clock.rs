//! Clock Module
//!
//! Time source shared by the cache store and its eviction policy.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use super::entry::current_timestamp_secs;

// == Clock Trait ==
/// A source of the current time in Unix seconds.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> f64;
}

// == System Clock ==
/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        current_timestamp_secs()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now: f64) {
        *self.lock() = now;
    }

    /// Moves the current time forward by `secs`.
    pub fn advance(&self, secs: f64) {
        *self.lock() += secs;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, f64> {
        // A poisoned f64 is still a valid time
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.lock()
    }
}
