//! Workload Module
//!
//! Hit-ratio experiment: replays a generated read stream against fresh
//! caches for each policy and reports how many reads were served without
//! touching the backing store.

mod generator;

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{BackingStore, CacheStore, CacheStoreBuilder, ManualClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::policy::PolicyKind;

pub use generator::{Request, RequestGenerator, HOT_READ_RATIO, NEW_HOT_RANGE_CHANCE};

/// Simulated seconds between consecutive reads.
pub const READ_INTERVAL_SECS: f64 = 0.0001;

/// Simulated time at which every run starts.
const SIMULATION_EPOCH: f64 = 1_000_000.0;

// == Hit Ratio Report ==
/// Outcome of one policy over `rounds` rounds of `reads` reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRatioReport {
    pub policy: PolicyKind,
    pub reads: usize,
    pub rounds: usize,
    pub hits: u64,
    pub misses: u64,
    pub coalesced_hits: u64,
    pub evictions: u64,
    pub hit_ratio: f64,
}

// == Run ==
/// Runs the hit-ratio experiment for one policy and read count.
///
/// Every round builds a new cache with a new policy instance, so no state
/// carries over between rounds. Time is simulated: the clock advances by
/// `READ_INTERVAL_SECS` per read, which keeps runs reproducible.
pub fn run_hit_ratio<S>(
    backing: &S,
    file_size: u64,
    kind: PolicyKind,
    reads: usize,
    config: &Config,
) -> Result<HitRatioReport>
where
    S: BackingStore + Clone,
{
    let mut generator = RequestGenerator::new(config.seed, file_size);
    let clock = ManualClock::new(SIMULATION_EPOCH);
    let mut report = HitRatioReport {
        policy: kind,
        reads,
        rounds: config.rounds,
        hits: 0,
        misses: 0,
        coalesced_hits: 0,
        evictions: 0,
        hit_ratio: 0.0,
    };

    for round in 0..config.rounds {
        generator.start_round();
        let mut cache = new_cache(backing.clone(), kind, config, &clock)?;

        for request in generator.by_ref().take(reads) {
            cache.get(request.offset, request.size)?;
            clock.advance(READ_INTERVAL_SECS);
        }

        let stats = cache.stats();
        debug!(
            policy = %kind,
            round,
            hits = stats.hits,
            misses = stats.misses,
            current_size = stats.current_size,
            "Round complete"
        );
        report.hits += stats.hits;
        report.misses += stats.misses;
        report.coalesced_hits += stats.coalesced_hits;
        report.evictions += stats.evictions;
    }

    let total = report.hits + report.misses;
    if total > 0 {
        report.hit_ratio = report.hits as f64 / total as f64;
    }
    info!(
        policy = %kind,
        reads,
        hit_ratio = report.hit_ratio,
        "Hit ratio measured"
    );
    Ok(report)
}

fn new_cache<S: BackingStore>(
    backing: S,
    kind: PolicyKind,
    config: &Config,
    clock: &ManualClock,
) -> Result<CacheStore<S>> {
    CacheStoreBuilder::new(backing)
        .max_size(config.max_size)
        .clock(clock.clone())
        .policy(kind.build_with(config.policy_options()))
        .cache_coalesced(config.cache_coalesced)
        .build()
}

// == Backing File ==
/// Writes `size` seeded random bytes to `path`.
pub fn generate_backing_file(path: &Path, size: usize, seed: u64) -> Result<()> {
    let mut bytes = vec![0u8; size];
    StdRng::seed_from_u64(seed).fill(&mut bytes[..]);
    fs::write(path, &bytes).map_err(|source| CacheError::Io { offset: 0, source })?;
    info!(path = %path.display(), size, "Generated backing file");
    Ok(())
}
