//! Configuration Module
//!
//! Handles loading cache and workload settings from environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::{CacheError, Result};
use crate::policy::{PolicyKind, PolicyOptions, DEFAULT_DECAY_FACTOR, DEFAULT_HOT_BLOCK_THRESHOLD};

/// Byte budget of each hit-ratio cache, small enough to keep the policies
/// evicting over a 3 KiB file.
pub const DEFAULT_WORKLOAD_MAX_SIZE: usize = 512;

/// Cache and hit-ratio workload parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Byte budget of every cache the workload builds
    pub max_size: usize,
    /// Policies to run; a single policy when `CACHE_POLICY` is set
    pub policies: Vec<PolicyKind>,
    /// Weight decay for the decayed-recency policy
    pub decay_factor: f64,
    /// Hot window in seconds for the hot block policy
    pub hot_block_threshold: f64,
    /// Insert coalesced large blocks as entries
    pub cache_coalesced: bool,
    /// Backing file; a random one is generated when unset
    pub backing_file: Option<PathBuf>,
    /// Size of the generated backing file in bytes
    pub file_size: usize,
    /// Reads per round, one run per value
    pub reads: Vec<usize>,
    /// Rounds per run, each with a fresh cache
    pub rounds: usize,
    /// Seed for the workload generator
    pub seed: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `WORKLOAD_MAX_SIZE` - Byte budget per cache (default: 512)
    /// - `CACHE_POLICY` - `decay`, `frequency`, `lru`, `lfu` or `hot-block` (default: all)
    /// - `DECAY_FACTOR` - Decayed-recency weight decay (default: 0.5)
    /// - `HOT_BLOCK_THRESHOLD` - Hot window in seconds (default: 10)
    /// - `CACHE_COALESCED` - Cache coalesced blocks (default: false)
    /// - `BACKING_FILE` - Path of an existing backing file (default: generated)
    /// - `WORKLOAD_FILE_SIZE` - Generated file size in bytes (default: 3072)
    /// - `WORKLOAD_READS` - Comma separated read counts (default: 1500,3000,5000)
    /// - `WORKLOAD_ROUNDS` - Rounds per run (default: 5)
    /// - `WORKLOAD_SEED` - Generator seed (default: 42)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: parse_var("WORKLOAD_MAX_SIZE").unwrap_or(defaults.max_size),
            policies: parse_var::<PolicyKind>("CACHE_POLICY")
                .map(|kind| vec![kind])
                .unwrap_or(defaults.policies),
            decay_factor: parse_var("DECAY_FACTOR").unwrap_or(defaults.decay_factor),
            hot_block_threshold: parse_var("HOT_BLOCK_THRESHOLD")
                .unwrap_or(defaults.hot_block_threshold),
            cache_coalesced: parse_var("CACHE_COALESCED").unwrap_or(defaults.cache_coalesced),
            backing_file: env::var("BACKING_FILE").ok().map(PathBuf::from),
            file_size: parse_var("WORKLOAD_FILE_SIZE").unwrap_or(defaults.file_size),
            reads: env::var("WORKLOAD_READS")
                .ok()
                .and_then(|v| {
                    v.split(',')
                        .map(|n| n.trim().parse().ok())
                        .collect::<Option<Vec<usize>>>()
                })
                .filter(|reads| !reads.is_empty())
                .unwrap_or(defaults.reads),
            rounds: parse_var("WORKLOAD_ROUNDS").unwrap_or(defaults.rounds),
            seed: parse_var("WORKLOAD_SEED").unwrap_or(defaults.seed),
        }
    }

    // == Validate ==
    /// Rejects settings the cache or workload cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "WORKLOAD_MAX_SIZE must be greater than zero".to_string(),
            ));
        }
        // Above 0.5 the weights of a full queue sum past 2 and the score
        // denominator can go negative
        if !(self.decay_factor > 0.0 && self.decay_factor <= 0.5) {
            return Err(CacheError::InvalidConfig(format!(
                "DECAY_FACTOR must be in (0, 0.5], got {}",
                self.decay_factor
            )));
        }
        if self.hot_block_threshold.is_nan() || self.hot_block_threshold < 0.0 {
            return Err(CacheError::InvalidConfig(format!(
                "HOT_BLOCK_THRESHOLD must be non-negative, got {}",
                self.hot_block_threshold
            )));
        }
        if self.backing_file.is_none() && self.file_size < 64 {
            return Err(CacheError::InvalidConfig(format!(
                "WORKLOAD_FILE_SIZE must hold at least one large block, got {}",
                self.file_size
            )));
        }
        Ok(())
    }

    pub fn policy_options(&self) -> PolicyOptions {
        PolicyOptions {
            decay_factor: self.decay_factor,
            hot_block_threshold: self.hot_block_threshold,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_WORKLOAD_MAX_SIZE,
            policies: PolicyKind::ALL.to_vec(),
            decay_factor: DEFAULT_DECAY_FACTOR,
            hot_block_threshold: DEFAULT_HOT_BLOCK_THRESHOLD,
            cache_coalesced: false,
            backing_file: None,
            file_size: 3 * 1024,
            reads: vec![1500, 3000, 5000],
            rounds: 5,
            seed: 42,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
