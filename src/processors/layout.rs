//! Axis-layout inference for raw buffers.
//!
//! Given only the shape of a rank 2-4 buffer, this module deduces which axis
//! plays which semantic role (batch, channel, height, width) using
//! priority-ordered heuristics over the channel-like axis sizes 1, 3, and 4.
//!
//! The heuristics are inherently ambiguous for non-canonical shapes (a 3x3x3
//! cube admits CHW, HWC, and BHW readings); ties resolve in the documented
//! priority order CHW -> HWC -> BHW (and BCHW -> BHWC at rank 4). That order
//! is a stable tie-break, not a guarantee of correctness.

use crate::core::{RenderError, RenderResult};
use tracing::debug;

/// Axis sizes that can denote a channel axis (gray, RGB, RGBA).
const CHANNEL_SIZES: [usize; 3] = [1, 3, 4];

/// Semantic role of one buffer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    /// Indexes independent images in a batch.
    Batch,
    /// Indexes color channels.
    Channel,
    /// Indexes image rows.
    Height,
    /// Indexes image columns.
    Width,
}

/// The recognized axis orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Height, width; single grayscale image.
    HW,
    /// Channel-first single image.
    CHW,
    /// Channel-last single image.
    HWC,
    /// Batch of grayscale images.
    BHW,
    /// Batch, channel-first.
    BCHW,
    /// Batch, channel-last.
    BHWC,
}

impl LayoutKind {
    /// The ordered role assignment for this kind.
    pub fn roles(self) -> &'static [AxisRole] {
        use AxisRole::*;
        match self {
            LayoutKind::HW => &[Height, Width],
            LayoutKind::CHW => &[Channel, Height, Width],
            LayoutKind::HWC => &[Height, Width, Channel],
            LayoutKind::BHW => &[Batch, Height, Width],
            LayoutKind::BCHW => &[Batch, Channel, Height, Width],
            LayoutKind::BHWC => &[Batch, Height, Width, Channel],
        }
    }
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LayoutKind::HW => "HW",
            LayoutKind::CHW => "CHW",
            LayoutKind::HWC => "HWC",
            LayoutKind::BHW => "BHW",
            LayoutKind::BCHW => "BCHW",
            LayoutKind::BHWC => "BHWC",
        };
        write!(f, "{name}")
    }
}

/// An ordered assignment of [`AxisRole`] to each axis of a concrete shape.
///
/// Invariants: exactly one Height and one Width axis, at most one Batch axis,
/// and a Channel axis that is either absent (implying one channel) or of
/// size 1, 3, or 4.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    kind: LayoutKind,
    shape: Vec<usize>,
    low_confidence: bool,
}

impl Layout {
    /// The recognized axis ordering.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// The shape the layout was inferred from.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The ordered role assignment, one entry per axis.
    pub fn roles(&self) -> &'static [AxisRole] {
        self.kind.roles()
    }

    /// Number of batch items (1 when no batch axis is present).
    pub fn batch(&self) -> usize {
        self.axis_size(AxisRole::Batch).unwrap_or(1)
    }

    /// Number of channels (1 when no channel axis is present).
    pub fn channels(&self) -> usize {
        self.axis_size(AxisRole::Channel).unwrap_or(1)
    }

    /// Image height in samples.
    pub fn height(&self) -> usize {
        self.axis_size(AxisRole::Height).unwrap_or(0)
    }

    /// Image width in samples.
    pub fn width(&self) -> usize {
        self.axis_size(AxisRole::Width).unwrap_or(0)
    }

    /// True for degenerate shapes (a spatial extent of 1) where the
    /// heuristics had little to go on. Diagnostic only, never an error.
    pub fn is_low_confidence(&self) -> bool {
        self.low_confidence
    }

    fn axis_size(&self, role: AxisRole) -> Option<usize> {
        self.roles()
            .iter()
            .position(|&r| r == role)
            .map(|i| self.shape[i])
    }

    fn new(kind: LayoutKind, shape: &[usize]) -> Self {
        let mut layout = Self {
            kind,
            shape: shape.to_vec(),
            low_confidence: false,
        };
        layout.low_confidence = layout.height() <= 1 || layout.width() <= 1;
        if layout.low_confidence {
            debug!(
                kind = %layout.kind,
                shape = ?layout.shape,
                "degenerate spatial extent, layout inference is low-confidence"
            );
        }
        layout
    }
}

fn is_channel_like(size: usize) -> bool {
    CHANNEL_SIZES.contains(&size)
}

/// Classifies the axis roles of a rank 2-4 buffer shape.
///
/// Heuristics, first match wins:
/// - rank 2: height, width.
/// - rank 3: a channel-like leading axis strictly smaller than both others is
///   channel-first; a channel-like trailing axis strictly smaller than both
///   others is channel-last; otherwise the leading axis is a batch, which is
///   only unambiguous when neither remaining axis looks channel-like. A
///   leading axis of size 4 reads as a batch of four rather than planar RGBA,
///   since the two cannot be told apart from the shape.
/// - rank 4: the leading axis is always the batch; a channel-like size at
///   index 1 means channel-first, at index 3 channel-last, preferring the
///   canonical channel-first position when both qualify.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedRank`] for ranks outside 2-4,
/// [`RenderError::InvalidDimension`] for zero-sized axes, and
/// [`RenderError::AmbiguousLayout`] when no heuristic matches.
pub fn infer_layout(shape: &[usize]) -> RenderResult<Layout> {
    if shape.contains(&0) {
        return Err(RenderError::invalid_dimension(format!(
            "buffer shape {shape:?} has a zero-sized axis"
        )));
    }

    match shape {
        [_, _] => Ok(Layout::new(LayoutKind::HW, shape)),
        &[s0, s1, s2] => {
            // Planar RGBA is indistinguishable from a batch of four, so the
            // leading axis only counts as a channel at sizes 1 and 3.
            if (s0 == 1 || s0 == 3) && s0 < s1 && s0 < s2 {
                Ok(Layout::new(LayoutKind::CHW, shape))
            } else if is_channel_like(s2) && s2 < s0 && s2 < s1 {
                Ok(Layout::new(LayoutKind::HWC, shape))
            } else if !is_channel_like(s1) && !is_channel_like(s2) {
                Ok(Layout::new(LayoutKind::BHW, shape))
            } else {
                Err(RenderError::ambiguous_layout(shape))
            }
        }
        &[_, s1, _, s3] => {
            if is_channel_like(s1) {
                Ok(Layout::new(LayoutKind::BCHW, shape))
            } else if is_channel_like(s3) {
                Ok(Layout::new(LayoutKind::BHWC, shape))
            } else {
                Err(RenderError::ambiguous_layout(shape))
            }
        }
        _ => Err(RenderError::unsupported_rank(shape.len())),
    }
}
