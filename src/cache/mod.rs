//! Cache Module
//!
//! Provides a read-through block cache with coalescing of small blocks into
//! large ones and pluggable eviction.

mod backing;
mod block;
mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use backing::{BackingStore, FileStore, MemoryStore};
pub use block::{
    BlockSize, CacheKey, BLOCKS_PER_LARGE, LARGE_BLOCK_BYTES, SMALL_BLOCK_BYTES,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{current_timestamp_secs, CacheEntry};
pub use stats::CacheStats;
pub use store::{CacheResponse, CacheStore, CacheStoreBuilder};

// == Public Constants ==
/// Default byte budget for resident entries
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024;
