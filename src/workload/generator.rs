//! Request Generator
//!
//! Produces a skewed read stream: most small reads fall in a narrow hot
//! range that occasionally moves, and a small read low in the file is
//! followed by a large read at the same offset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cache::BlockSize;

/// Share of reads drawn from the hot range.
pub const HOT_READ_RATIO: f64 = 0.7;

/// Chance per read that the hot range jumps elsewhere.
pub const NEW_HOT_RANGE_CHANCE: f64 = 0.01;

/// The hot range is this fraction of the file, as a divisor.
const HOT_RANGE_DIVISOR: u64 = 100;

// == Request ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub offset: u64,
    pub size: BlockSize,
}

// == Request Generator ==
#[derive(Debug)]
pub struct RequestGenerator {
    rng: StdRng,
    file_size: u64,
    hot_start: u64,
    hot_end: u64,
    /// Small reads below this offset are followed by a large read
    metadata_first_limit: u64,
    previous: Option<Request>,
}

impl RequestGenerator {
    /// Creates a generator over a backing store of `file_size` bytes.
    ///
    /// `file_size` must hold at least one large block.
    pub fn new(seed: u64, file_size: u64) -> Self {
        let mut generator = Self {
            rng: StdRng::seed_from_u64(seed),
            file_size,
            hot_start: 0,
            hot_end: 0,
            metadata_first_limit: 0,
            previous: None,
        };
        generator.start_round();
        generator
    }

    // == Start Round ==
    /// Picks a fresh hot range and metadata-first limit.
    pub fn start_round(&mut self) {
        self.move_hot_range();
        self.metadata_first_limit = self
            .rng
            .random_range(self.file_size / 10..=self.file_size / 5);
    }

    fn move_hot_range(&mut self) {
        self.hot_start = self.rng.random_range(0..self.file_size);
        self.hot_end = (self.hot_start + self.file_size / HOT_RANGE_DIVISOR).min(self.file_size - 1);
    }

    pub fn hot_range(&self) -> (u64, u64) {
        (self.hot_start, self.hot_end)
    }

    pub fn metadata_first_limit(&self) -> u64 {
        self.metadata_first_limit
    }

    fn follows_metadata(&self) -> Option<u64> {
        match self.previous {
            Some(Request {
                offset,
                size: BlockSize::Small,
            }) if offset > 0 && offset < self.metadata_first_limit => Some(offset),
            _ => None,
        }
    }

    /// Keeps the whole block inside the file.
    fn clamp(&self, offset: u64, size: BlockSize) -> u64 {
        offset.min(self.file_size - size.byte_size() as u64)
    }
}

impl Iterator for RequestGenerator {
    type Item = Request;

    fn next(&mut self) -> Option<Request> {
        let (offset, size) = if let Some(offset) = self.follows_metadata() {
            (offset, BlockSize::Large)
        } else if self.rng.random_bool(HOT_READ_RATIO) {
            (
                self.rng.random_range(self.hot_start..=self.hot_end),
                BlockSize::Small,
            )
        } else {
            (self.rng.random_range(0..self.file_size), BlockSize::Small)
        };

        let request = Request {
            offset: self.clamp(offset, size),
            size,
        };
        self.previous = Some(request);

        if self.rng.random_bool(NEW_HOT_RANGE_CHANCE) {
            self.move_hot_range();
        }
        Some(request)
    }
}
