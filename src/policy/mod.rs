//! Eviction Policy Module
//!
//! Pluggable scoring strategies deciding which resident block to discard
//! when an insertion would exceed the byte budget.
//!
//! Every policy is an independent type behind [`EvictionPolicy`]; the cache
//! store owns exactly one boxed instance and never shares it.

mod decay;
mod frequency;
mod hot_block;
mod lfu;
mod lru;

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::cache::{CacheEntry, CacheKey};
use crate::error::{CacheError, Result};

pub use decay::DecayedRecencyPolicy;
pub use frequency::FrequencyRecencyPolicy;
pub use hot_block::HotBlockPolicy;
pub use lfu::NaiveLfuPolicy;
pub use lru::LruPolicy;

// == Public Constants ==
/// Default weight decay applied per position in the recency queue.
pub const DEFAULT_DECAY_FACTOR: f64 = 0.5;

/// Default window, in seconds, within which a block counts as hot.
pub const DEFAULT_HOT_BLOCK_THRESHOLD: f64 = 10.0;

// == Eviction Policy Trait ==
/// Victim selection over the resident entries of one cache store.
pub trait EvictionPolicy: Debug + Send {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Bookkeeping hook invoked on every insertion attempt.
    fn record_access(&mut self, key: &CacheKey, now: f64);

    /// Picks a resident key to evict, or `None` when nothing is scoreable.
    ///
    /// Never touches the entries themselves, though some policies update
    /// their own counters here.
    fn choose_victim(
        &mut self,
        entries: &HashMap<CacheKey, CacheEntry>,
        now: f64,
    ) -> Option<CacheKey>;

    /// Drops whatever state is held for `key`.
    ///
    /// Policies keep per-key state for evicted keys unless the store is
    /// built with `forget_evicted`, so that state grows with every distinct
    /// key seen.
    fn forget(&mut self, _key: &CacheKey) {}
}

// == Helpers ==
/// Returns the key with the lowest score. Ties keep the first seen.
pub(crate) fn lowest_scored<I>(scored: I) -> Option<CacheKey>
where
    I: IntoIterator<Item = (CacheKey, f64)>,
{
    scored
        .into_iter()
        .fold(None, |best: Option<(CacheKey, f64)>, (key, score)| match best {
            Some((_, lowest)) if lowest <= score => best,
            _ => Some((key, score)),
        })
        .map(|(key, _)| key)
}

// == Policy Kind ==
/// Names the available policies and builds fresh instances of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    DecayedRecency,
    FrequencyRecency,
    Lru,
    NaiveLfu,
    HotBlock,
}

/// Tunables consumed by [`PolicyKind::build_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOptions {
    pub decay_factor: f64,
    pub hot_block_threshold: f64,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            decay_factor: DEFAULT_DECAY_FACTOR,
            hot_block_threshold: DEFAULT_HOT_BLOCK_THRESHOLD,
        }
    }
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::DecayedRecency,
        PolicyKind::FrequencyRecency,
        PolicyKind::Lru,
        PolicyKind::NaiveLfu,
        PolicyKind::HotBlock,
    ];

    /// Builds a new instance with default tunables.
    pub fn build(self) -> Box<dyn EvictionPolicy> {
        self.build_with(PolicyOptions::default())
    }

    /// Builds a new instance. Each call returns independent state.
    pub fn build_with(self, options: PolicyOptions) -> Box<dyn EvictionPolicy> {
        match self {
            PolicyKind::DecayedRecency => {
                Box::new(DecayedRecencyPolicy::new(options.decay_factor))
            }
            PolicyKind::FrequencyRecency => Box::new(FrequencyRecencyPolicy::new()),
            PolicyKind::Lru => Box::new(LruPolicy),
            PolicyKind::NaiveLfu => Box::new(NaiveLfuPolicy::new()),
            PolicyKind::HotBlock => Box::new(HotBlockPolicy::new(options.hot_block_threshold)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::DecayedRecency => "decay",
            PolicyKind::FrequencyRecency => "frequency",
            PolicyKind::Lru => "lru",
            PolicyKind::NaiveLfu => "lfu",
            PolicyKind::HotBlock => "hot-block",
        }
    }
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::DecayedRecency
    }
}

impl FromStr for PolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decay" | "decayed-recency" => Ok(PolicyKind::DecayedRecency),
            "frequency" | "frequency-recency" => Ok(PolicyKind::FrequencyRecency),
            "lru" => Ok(PolicyKind::Lru),
            "lfu" | "naive-lfu" => Ok(PolicyKind::NaiveLfu),
            "hot-block" | "hot_block" | "hot" => Ok(PolicyKind::HotBlock),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown eviction policy '{}'",
                other
            ))),
        }
    }
}

impl Serialize for PolicyKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
