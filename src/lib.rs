//! Block Cache - A fixed-granularity read-through byte cache
//!
//! Serves small (metadata) and large (data) blocks from memory, rebuilds
//! large blocks from resident small ones, and evicts under a byte budget
//! with a pluggable scoring policy.

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;
pub mod workload;

pub use cache::{BlockSize, CacheKey, CacheResponse, CacheStore, FileStore, MemoryStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use policy::{EvictionPolicy, PolicyKind};
