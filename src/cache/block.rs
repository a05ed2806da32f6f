//! Block Granularity Module
//!
//! Defines the two read sizes the cache serves and the key identifying a
//! cached range.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Constants ==
/// Byte length of a small (metadata) block.
pub const SMALL_BLOCK_BYTES: usize = 8;

/// Number of consecutive small blocks making up one large block.
pub const BLOCKS_PER_LARGE: usize = 8;

/// Byte length of a large (data) block.
pub const LARGE_BLOCK_BYTES: usize = SMALL_BLOCK_BYTES * BLOCKS_PER_LARGE;

// == Block Size ==
/// Granularity of a cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSize {
    /// Metadata granularity
    Small,
    /// Data granularity, `BLOCKS_PER_LARGE` small blocks wide
    Large,
}

impl BlockSize {
    /// Returns the byte length of a block of this granularity.
    pub const fn byte_size(self) -> usize {
        match self {
            BlockSize::Small => SMALL_BLOCK_BYTES,
            BlockSize::Large => LARGE_BLOCK_BYTES,
        }
    }

    /// Returns true for the large granularity.
    pub const fn is_large(self) -> bool {
        matches!(self, BlockSize::Large)
    }
}

impl TryFrom<usize> for BlockSize {
    type Error = CacheError;

    fn try_from(bytes: usize) -> Result<Self> {
        match bytes {
            SMALL_BLOCK_BYTES => Ok(BlockSize::Small),
            LARGE_BLOCK_BYTES => Ok(BlockSize::Large),
            other => Err(CacheError::InvalidGranularity(format!(
                "{} is not a block size (expected {} or {})",
                other, SMALL_BLOCK_BYTES, LARGE_BLOCK_BYTES
            ))),
        }
    }
}

impl FromStr for BlockSize {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "metadata" => Ok(BlockSize::Small),
            "large" | "data" => Ok(BlockSize::Large),
            other => other
                .parse::<usize>()
                .map_err(|_| CacheError::InvalidGranularity(other.to_string()))
                .and_then(BlockSize::try_from),
        }
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSize::Small => write!(f, "small"),
            BlockSize::Large => write!(f, "large"),
        }
    }
}

// == Cache Key ==
/// Identity of a cached range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CacheKey {
    /// Byte offset into the backing store
    pub offset: u64,
    /// Granularity of the range
    pub size: BlockSize,
}

impl CacheKey {
    pub const fn new(offset: u64, size: BlockSize) -> Self {
        Self { offset, size }
    }

    /// Byte length of the range this key names.
    pub const fn byte_len(&self) -> usize {
        self.size.byte_size()
    }

    /// The small keys whose ranges tile this key's range, in offset order.
    ///
    /// Empty for small keys, and for large keys whose range would run past
    /// `u64::MAX`.
    pub fn small_blocks(&self) -> Vec<CacheKey> {
        if !self.size.is_large() {
            return Vec::new();
        }
        (0..BLOCKS_PER_LARGE as u64)
            .map(|i| {
                self.offset
                    .checked_add(i * SMALL_BLOCK_BYTES as u64)
                    .map(|offset| CacheKey::new(offset, BlockSize::Small))
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.size, self.offset)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &CacheKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_large_is_eight_small() {
        assert_eq!(BlockSize::Small.byte_size(), 8);
        assert_eq!(BlockSize::Large.byte_size(), 64);
        assert_eq!(
            BlockSize::Large.byte_size(),
            BLOCKS_PER_LARGE * BlockSize::Small.byte_size()
        );
    }

    #[test]
    fn test_key_equality() {
        assert_eq!(
            CacheKey::new(10, BlockSize::Small),
            CacheKey::new(10, BlockSize::Small)
        );
        assert_ne!(
            CacheKey::new(10, BlockSize::Small),
            CacheKey::new(10, BlockSize::Large)
        );
        assert_ne!(
            CacheKey::new(10, BlockSize::Small),
            CacheKey::new(18, BlockSize::Small)
        );
    }

    #[test]
    fn test_equal_keys_hash_equal() {
        let a = CacheKey::new(42, BlockSize::Large);
        let b = CacheKey::new(42, BlockSize::Large);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_try_from_bytes() {
        assert_eq!(BlockSize::try_from(8).unwrap(), BlockSize::Small);
        assert_eq!(BlockSize::try_from(64).unwrap(), BlockSize::Large);
        assert!(matches!(
            BlockSize::try_from(16),
            Err(CacheError::InvalidGranularity(_))
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("small".parse::<BlockSize>().unwrap(), BlockSize::Small);
        assert_eq!("LARGE".parse::<BlockSize>().unwrap(), BlockSize::Large);
        assert_eq!("64".parse::<BlockSize>().unwrap(), BlockSize::Large);
        assert!("huge".parse::<BlockSize>().is_err());
        assert!("0".parse::<BlockSize>().is_err());
    }

    #[test]
    fn test_small_blocks_of_large_key() {
        let blocks = CacheKey::new(16, BlockSize::Large).small_blocks();
        let offsets: Vec<u64> = blocks.iter().map(|k| k.offset).collect();

        assert_eq!(offsets, vec![16, 24, 32, 40, 48, 56, 64, 72]);
        assert!(blocks.iter().all(|k| k.size == BlockSize::Small));
    }

    #[test]
    fn test_small_blocks_near_u64_max() {
        assert!(CacheKey::new(u64::MAX - 7, BlockSize::Large)
            .small_blocks()
            .is_empty());

        let last = CacheKey::new(u64::MAX - 63, BlockSize::Large).small_blocks();
        assert_eq!(last.len(), 8);
        assert_eq!(last[7].offset, u64::MAX - 7);
    }

    #[test]
    fn test_small_blocks_of_small_key_is_empty() {
        assert!(CacheKey::new(0, BlockSize::Small).small_blocks().is_empty());
    }
}
