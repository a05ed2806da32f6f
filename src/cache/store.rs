//! Cache Store Module
//!
//! Main cache engine: lookup, large-block coalescing, backing-store
//! fallback, and policy-driven eviction under a byte budget.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{
    BackingStore, BlockSize, CacheEntry, CacheKey, CacheStats, Clock, SystemClock,
    DEFAULT_MAX_SIZE,
};
use crate::error::{CacheError, Result};
use crate::policy::{EvictionPolicy, PolicyKind};

// == Cache Response ==
/// Bytes returned by [`CacheStore::get`] and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheResponse {
    pub data: Vec<u8>,
    /// True when served from a resident entry or by coalescing
    pub is_hit: bool,
}

impl CacheResponse {
    fn hit(data: Vec<u8>) -> Self {
        Self { data, is_hit: true }
    }

    fn miss(data: Vec<u8>) -> Self {
        Self {
            data,
            is_hit: false,
        }
    }
}

// == Cache Store ==
/// Read-through block cache in front of a backing store.
#[derive(Debug)]
pub struct CacheStore<S> {
    /// Resident blocks
    entries: HashMap<CacheKey, CacheEntry>,
    /// Sum of resident entry lengths
    current_size: usize,
    /// Byte budget
    max_size: usize,
    /// Victim selection, owned by this store alone
    policy: Box<dyn EvictionPolicy>,
    /// Source of truth for misses
    backing: S,
    clock: Arc<dyn Clock>,
    /// Performance statistics
    stats: CacheStats,
    /// Whether coalesced large blocks are inserted as entries
    cache_coalesced: bool,
    /// Whether evicted keys are dropped from policy state
    forget_evicted: bool,
}

impl<S: BackingStore> CacheStore<S> {
    // == Constructor ==
    /// Creates a store with the default policy and the system clock.
    ///
    /// Unlike [`CacheStoreBuilder::build`], a `max_size` of zero is accepted:
    /// every insert then evicts whatever the policy offers, so the store holds
    /// at most the newest block.
    ///
    /// # Arguments
    /// * `backing` - The store to read misses from
    /// * `max_size` - Byte budget for resident entries
    pub fn new(backing: S, max_size: usize) -> Self {
        Self::from_parts(
            backing,
            max_size,
            PolicyKind::default().build(),
            Arc::new(SystemClock),
            false,
            false,
        )
    }

    /// Starts a builder with default settings.
    pub fn builder(backing: S) -> CacheStoreBuilder<S> {
        CacheStoreBuilder::new(backing)
    }

    fn from_parts(
        backing: S,
        max_size: usize,
        policy: Box<dyn EvictionPolicy>,
        clock: Arc<dyn Clock>,
        cache_coalesced: bool,
        forget_evicted: bool,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            current_size: 0,
            max_size,
            policy,
            backing,
            clock,
            stats: CacheStats::new(),
            cache_coalesced,
            forget_evicted,
        }
    }

    // == Get ==
    /// Returns the block at `offset`, reading through to the backing store
    /// on a miss.
    ///
    /// A missing large block is first rebuilt from resident small blocks
    /// when all of them are present; that counts as a hit.
    ///
    /// # Errors
    /// Any backing-store failure, including a read of the wrong length.
    pub fn get(&mut self, offset: u64, size: BlockSize) -> Result<CacheResponse> {
        let key = CacheKey::new(offset, size);
        let now = self.clock.now();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.touch(now);
            self.stats.record_hit();
            return Ok(CacheResponse::hit(entry.data.clone()));
        }

        if size.is_large() {
            if let Some(data) = self.coalesce(&key) {
                self.stats.record_coalesced_hit();
                if self.cache_coalesced {
                    self.insert(key, data.clone())?;
                }
                return Ok(CacheResponse::hit(data));
            }
        }

        debug!(%key, "Cache miss, reading backing store");
        let data = self.backing.read_range(offset, size.byte_size())?;
        self.insert(key, data.clone())?;
        self.stats.record_miss();
        Ok(CacheResponse::miss(data))
    }

    // == Insert ==
    /// Stores `data` under `key`, evicting as needed.
    ///
    /// The policy's access hook runs first, then victims are removed until
    /// the new entry fits, nothing is left, or the policy has no victim. In
    /// the last two cases the entry is stored anyway and the store runs
    /// over budget.
    ///
    /// # Errors
    /// `ShortRead` when `data` is not exactly one block of `key`'s size.
    pub fn insert(&mut self, key: CacheKey, data: Vec<u8>) -> Result<()> {
        if data.len() != key.byte_len() {
            return Err(CacheError::ShortRead {
                offset: key.offset,
                expected: key.byte_len(),
                actual: data.len(),
            });
        }

        let now = self.clock.now();
        if let Some(previous) = self.entries.remove(&key) {
            self.current_size -= previous.len();
        }

        self.policy.record_access(&key, now);
        self.make_room(data.len(), now);

        self.current_size += data.len();
        self.entries.insert(key, CacheEntry::new(data, now));
        Ok(())
    }

    // == Make Room ==
    fn make_room(&mut self, incoming: usize, now: f64) {
        while !self.entries.is_empty() && self.current_size + incoming > self.max_size {
            let victim = match self.policy.choose_victim(&self.entries, now) {
                Some(victim) => victim,
                None => {
                    warn!(
                        policy = self.policy.name(),
                        current_size = self.current_size,
                        incoming,
                        max_size = self.max_size,
                        "No eviction victim, inserting over capacity"
                    );
                    return;
                }
            };

            match self.entries.remove(&victim) {
                Some(evicted) => {
                    self.current_size -= evicted.len();
                    self.stats.record_eviction();
                    if self.forget_evicted {
                        self.policy.forget(&victim);
                    }
                    debug!(%victim, policy = self.policy.name(), "Evicted block");
                }
                None => {
                    warn!(%victim, policy = self.policy.name(), "Victim is not resident");
                    return;
                }
            }
        }

        if self.current_size + incoming > self.max_size {
            warn!(
                current_size = self.current_size,
                incoming,
                max_size = self.max_size,
                "Block exceeds capacity on its own"
            );
        }
    }

    // == Coalesce ==
    /// Concatenates the resident small blocks tiling `key`, if all are
    /// present. Access times of the small blocks are left alone.
    fn coalesce(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let mut data = Vec::with_capacity(key.byte_len());
        for block in key.small_blocks() {
            data.extend_from_slice(&self.entries.get(&block)?.data);
        }
        debug!(%key, "Coalesced large block from small blocks");
        Some(data)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.current_size);
        stats
    }

    // == Introspection ==
    /// Sum of resident entry lengths in bytes.
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.entries.keys()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn backing(&self) -> &S {
        &self.backing
    }
}

// == Builder ==
/// Configures a [`CacheStore`].
#[derive(Debug)]
pub struct CacheStoreBuilder<S> {
    backing: S,
    max_size: usize,
    policy: Option<Box<dyn EvictionPolicy>>,
    clock: Option<Arc<dyn Clock>>,
    cache_coalesced: bool,
    forget_evicted: bool,
}

impl<S: BackingStore> CacheStoreBuilder<S> {
    pub fn new(backing: S) -> Self {
        Self {
            backing,
            max_size: DEFAULT_MAX_SIZE,
            policy: None,
            clock: None,
            cache_coalesced: false,
            forget_evicted: false,
        }
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Uses the given policy instance. Defaults to decayed recency.
    pub fn policy(mut self, policy: Box<dyn EvictionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Uses a fresh instance of `kind` with default tunables.
    pub fn policy_kind(self, kind: PolicyKind) -> Self {
        self.policy(kind.build())
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Also insert large blocks rebuilt by coalescing. Off by default.
    pub fn cache_coalesced(mut self, enabled: bool) -> Self {
        self.cache_coalesced = enabled;
        self
    }

    /// Drop an evicted key's policy state instead of keeping it for a
    /// later re-insert. Off by default.
    pub fn forget_evicted(mut self, enabled: bool) -> Self {
        self.forget_evicted = enabled;
        self
    }

    pub fn build(self) -> Result<CacheStore<S>> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be greater than zero".to_string(),
            ));
        }

        Ok(CacheStore::from_parts(
            self.backing,
            self.max_size,
            self.policy.unwrap_or_else(|| PolicyKind::default().build()),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.cache_coalesced,
            self.forget_evicted,
        ))
    }
}
