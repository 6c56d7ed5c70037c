//! Named default constants used throughout the render pipeline.
//!
//! Defaults live here as plain constants rather than process-wide mutable
//! state; callers override them through [`crate::pipeline::RenderConfig`].

/// Default maximum width (in pixels) an image is downsampled to before
/// encoding.
pub const DEFAULT_MAX_WIDTH: u32 = 1024;

/// Default maximum height (in pixels) an image is downsampled to before
/// encoding.
pub const DEFAULT_MAX_HEIGHT: u32 = 1024;

/// Default width of the padding band between grid cells, in pixels.
pub const DEFAULT_PADDING: u32 = 2;

/// Default intensity of grid padding and filler cells.
pub const DEFAULT_PAD_VALUE: u8 = 0;

/// Numeric tolerance used when classifying a buffer's value range.
///
/// A sample counts as integral-like when its fractional part is below this
/// value, and range bounds are checked with the same slack.
pub const RANGE_EPSILON: f32 = 1e-6;

/// Buffers with at most this many samples are scanned exhaustively when
/// classifying their value range; larger buffers are sampled with a
/// deterministic stride instead.
pub const RANGE_SCAN_THRESHOLD: usize = 1 << 20;

/// Number of samples visited when a buffer is too large for a full scan.
pub const RANGE_SAMPLE_TARGET: usize = 1 << 16;

/// Batches larger than this are normalized in parallel.
pub const PARALLEL_BATCH_THRESHOLD: usize = 4;

/// Hard ceiling on the byte length of a single encoded escape sequence.
///
/// Exceeding it fails with [`crate::RenderError::PayloadTooLarge`] instead of
/// truncating, since a truncated base64 payload decodes to a corrupt image.
pub const PROTOCOL_PAYLOAD_LIMIT: usize = 4 * 1024 * 1024;
