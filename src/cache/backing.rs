//! Backing Store Module
//!
//! The read capability the cache fronts, plus file and in-memory stores.

use std::fmt::Debug;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CacheError, Result};

// == Backing Store Trait ==
/// Read-only, byte-addressable source of truth.
///
/// Implementations return exactly `length` bytes or an error; they never
/// hand back a shorter buffer.
pub trait BackingStore: Debug {
    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>>;
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        (**self).read_range(offset, length)
    }
}

// == File Store ==
/// A flat file on disk.
///
/// Each read opens, seeks, reads and closes the file; no handle is kept
/// between calls.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackingStore for FileStore {
    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        debug!(path = %self.path.display(), offset, length, "Reading backing file");

        let mut file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CacheError::NotFound(self.path.clone()),
            _ => CacheError::Io { offset, source: e },
        })?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|source| CacheError::Io { offset, source })?;

        let mut data = Vec::with_capacity(length);
        file.take(length as u64)
            .read_to_end(&mut data)
            .map_err(|source| CacheError::Io { offset, source })?;

        if data.len() != length {
            return Err(CacheError::ShortRead {
                offset,
                expected: length,
                actual: data.len(),
            });
        }
        Ok(data)
    }
}

// == Memory Store ==
/// An in-memory byte buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl BackingStore for MemoryStore {
    fn read_range(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.bytes.len());
        let end = start.saturating_add(length).min(self.bytes.len());

        if end - start != length {
            return Err(CacheError::ShortRead {
                offset,
                expected: length,
                actual: end - start,
            });
        }
        Ok(self.bytes[start..end].to_vec())
    }
}
