//! Error types for the render pipeline.
//!
//! This module defines the error kinds that can occur while turning a raw
//! buffer into an inline-image escape sequence, along with utility
//! constructors for creating them with appropriate context. Every failure is
//! terminal and local to one invocation; the pipeline is deterministic, so
//! there is no retry policy.

use thiserror::Error;

/// Convenient result alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Enum representing the errors that can occur in the render pipeline.
///
/// The core never logs errors; it returns them and leaves surfacing to the
/// caller (the CLI prints the chain and maps any variant to a non-zero exit
/// code).
#[derive(Error, Debug)]
pub enum RenderError {
    /// The buffer rank is outside the supported 2-4 range.
    #[error("unsupported buffer rank {rank}: expected 2, 3, or 4 axes")]
    UnsupportedRank {
        /// Number of axes of the offending buffer.
        rank: usize,
    },

    /// No layout heuristic matched the buffer shape.
    #[error("cannot deduce axis layout from shape {shape:?}")]
    AmbiguousLayout {
        /// Shape of the offending buffer.
        shape: Vec<usize>,
    },

    /// An explicitly requested grid has fewer cells than the batch.
    #[error("grid of {rows}x{cols} cells cannot hold a batch of {batch} images")]
    GridTooSmall {
        /// Requested number of grid rows.
        rows: usize,
        /// Requested number of grid columns.
        cols: usize,
        /// Number of images in the batch.
        batch: usize,
    },

    /// A dimension is zero, negative, or otherwise unusable.
    #[error("invalid dimension: {message}")]
    InvalidDimension {
        /// A message describing the invalid dimension.
        message: String,
    },

    /// The encoded escape sequence exceeds the protocol ceiling.
    #[error("encoded payload of {size} bytes exceeds the protocol limit of {limit} bytes")]
    PayloadTooLarge {
        /// Byte length of the encoded sequence.
        size: usize,
        /// The protocol ceiling that was exceeded.
        limit: usize,
    },

    /// Error from the image codec (decoding a file or encoding PNG).
    #[error("image codec")]
    Codec(#[from] image::ImageError),

    /// IO error from the final write to the output stream.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates a RenderError for a buffer rank outside 2-4.
    pub fn unsupported_rank(rank: usize) -> Self {
        Self::UnsupportedRank { rank }
    }

    /// Creates a RenderError for a shape no layout heuristic matches.
    pub fn ambiguous_layout(shape: &[usize]) -> Self {
        Self::AmbiguousLayout {
            shape: shape.to_vec(),
        }
    }

    /// Creates a RenderError for an explicit grid that cannot hold the batch.
    pub fn grid_too_small(rows: usize, cols: usize, batch: usize) -> Self {
        Self::GridTooSmall { rows, cols, batch }
    }

    /// Creates a RenderError for an unusable dimension.
    pub fn invalid_dimension(message: impl Into<String>) -> Self {
        Self::InvalidDimension {
            message: message.into(),
        }
    }

    /// Creates a RenderError for an escape sequence over the protocol limit.
    pub fn payload_too_large(size: usize, limit: usize) -> Self {
        Self::PayloadTooLarge { size, limit }
    }
}
