//! Ragged-batch layout metadata and the pack/unpack service boundary.

use serde::Serialize;
use thiserror::Error;

use crate::shape::Shape;

/// Validation failures for cumulative-offset construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cumulative offsets must contain at least one entry")]
    Empty,
    #[error("cumulative offsets must start at zero, got {0}")]
    NonZeroStart(usize),
    #[error("cumulative offsets must be non-decreasing: {prev} followed by {next} at position {position}")]
    NonMonotone {
        position: usize,
        prev: usize,
        next: usize,
    },
}

/// Cumulative sequence-length offsets describing where each batch member starts inside a
/// packed dense buffer. Entry 0 is always 0 and the difference between entries `i + 1` and
/// `i` gives sequence `i`'s length, so a batch of `n` sequences carries `n + 1` offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumSeqLengths {
    offsets: Vec<usize>,
}

impl CumSeqLengths {
    /// Validates and wraps a cumulative offset vector.
    pub fn new(offsets: Vec<usize>) -> Result<Self, LayoutError> {
        let first = *offsets.first().ok_or(LayoutError::Empty)?;
        if first != 0 {
            return Err(LayoutError::NonZeroStart(first));
        }
        for (position, window) in offsets.windows(2).enumerate() {
            if window[1] < window[0] {
                return Err(LayoutError::NonMonotone {
                    position: position + 1,
                    prev: window[0],
                    next: window[1],
                });
            }
        }
        Ok(CumSeqLengths { offsets })
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of sequences described by these offsets.
    pub fn batch_size(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total packed length, i.e. the final offset.
    pub fn total_len(&self) -> usize {
        *self.offsets.last().expect("offsets validated non-empty")
    }

    /// Length of the longest sequence in the batch.
    pub fn max_len(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|window| window[1] - window[0])
            .max()
            .unwrap_or(0)
    }
}

/// Ragged batch handle: per-sequence shapes plus an opaque storage buffer owned by the
/// layout service. The shapes are the bookkeeping this crate needs to re-split gradients;
/// everything about the buffer's internal layout belongs to the service.
#[derive(Debug, Clone)]
pub struct NestedTensor<B> {
    sizes: Vec<Shape>,
    storage: B,
}

impl<B> NestedTensor<B> {
    pub fn new(sizes: Vec<Shape>, storage: B) -> Self {
        NestedTensor { sizes, storage }
    }

    /// Per-sequence shapes, one per batch member.
    pub fn sizes(&self) -> &[Shape] {
        &self.sizes
    }

    pub fn batch_size(&self) -> usize {
        self.sizes.len()
    }

    pub fn storage(&self) -> &B {
        &self.storage
    }

    pub fn into_storage(self) -> B {
        self.storage
    }
}

/// Pack/unpack service that owns ragged buffer layout.
///
/// Implementations decide how sequences are flattened or padded; callers only rely on
/// `unpack(pack(t))` restoring the original per-sequence shapes.
pub trait NestedLayout {
    /// Dense buffer handle produced by packing.
    type Buffer;

    /// Repacks a ragged tensor into one dense buffer laid out per `offsets`.
    fn pack(
        &self,
        tensor: &NestedTensor<Self::Buffer>,
        offsets: &CumSeqLengths,
    ) -> anyhow::Result<Self::Buffer>;

    /// Splits a dense buffer back into the given ragged per-sequence shapes.
    fn unpack(
        &self,
        buffer: Self::Buffer,
        sizes: &[Shape],
        offsets: &CumSeqLengths,
    ) -> anyhow::Result<NestedTensor<Self::Buffer>>;
}
