//! Error types for the block cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the block cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store does not exist
    #[error("Backing store not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Backing store read failed for any other reason
    #[error("I/O error reading offset {offset}: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// Backing store returned fewer (or more) bytes than the block size
    #[error("Short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    /// Unknown block size name or value
    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the block cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_read_message() {
        let err = CacheError::ShortRead {
            offset: 120,
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Short read at offset 120: expected 8 bytes, got 3"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = CacheError::Io {
            offset: 0,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
