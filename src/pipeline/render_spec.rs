//! Render-size tokens for the inline-image protocol.
//!
//! The protocol expresses each render axis as a number of character cells
//! (`N`), pixels (`Npx`), a percentage of the viewport (`N%`), or `auto`.
//! Character-cell size is a terminal property the pipeline cannot know, so
//! tokens are carried through unresolved and only serialized at encode time.
//! They are display hints: they never change the encoded pixel buffer.

use crate::core::{RenderError, RenderResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One render axis of a [`RenderSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Let the terminal derive the dimension from the image.
    #[default]
    Auto,
    /// N character cells.
    Cells(u32),
    /// N pixels.
    Pixels(u32),
    /// N percent of the viewport.
    Percent(u32),
}

impl FromStr for Dimension {
    type Err = RenderError;

    /// Parses a render-size token.
    ///
    /// Accepts `""` and `"auto"` (auto), `"N"` (cells), `"Npx"` (pixels),
    /// and `"N%"` (percent). A zero quantity is rejected, since the protocol
    /// cannot render a zero-sized image.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parse_count = |digits: &str, what: &str| -> RenderResult<u32> {
            let n: u32 = digits.parse().map_err(|_| {
                RenderError::invalid_dimension(format!("malformed render size token {token:?}"))
            })?;
            if n == 0 {
                return Err(RenderError::invalid_dimension(format!(
                    "render size of zero {what} requested"
                )));
            }
            Ok(n)
        };

        if token.is_empty() || token == "auto" {
            Ok(Dimension::Auto)
        } else if let Some(digits) = token.strip_suffix("px") {
            Ok(Dimension::Pixels(parse_count(digits, "pixels")?))
        } else if let Some(digits) = token.strip_suffix('%') {
            Ok(Dimension::Percent(parse_count(digits, "percent")?))
        } else {
            Ok(Dimension::Cells(parse_count(token, "cells")?))
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Auto => write!(f, "auto"),
            Dimension::Cells(n) => write!(f, "{n}"),
            Dimension::Pixels(n) => write!(f, "{n}px"),
            Dimension::Percent(n) => write!(f, "{n}%"),
        }
    }
}

/// Target render dimensions plus the stretch flag.
///
/// With `stretch` false the terminal fills the requested box without
/// distorting the image; with it true the image is stretched to the box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Requested render width.
    pub width: Dimension,
    /// Requested render height.
    pub height: Dimension,
    /// Ignore the image's aspect ratio when filling the requested box.
    pub stretch: bool,
}

impl RenderSpec {
    /// Cross-checks a pixel-unit spec against the actual buffer aspect ratio.
    ///
    /// When both axes request pixel units and `stretch` is false, a declared
    /// box whose aspect ratio disagrees with the buffer would distort the
    /// image on the client side. The mismatch is reported rather than
    /// silently overridden; the tolerance is one pixel of rounding on the
    /// smaller height.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimension`] on a mismatch.
    pub fn check_aspect(&self, buffer_w: u32, buffer_h: u32) -> RenderResult<()> {
        let (Dimension::Pixels(w), Dimension::Pixels(h)) = (self.width, self.height) else {
            return Ok(());
        };
        if self.stretch {
            return Ok(());
        }

        let declared = f64::from(w) / f64::from(h);
        let actual = f64::from(buffer_w) / f64::from(buffer_h);
        let tolerance = 1.0 / f64::from(h.min(buffer_h));

        if (declared - actual).abs() > tolerance {
            return Err(RenderError::invalid_dimension(format!(
                "declared render box {w}x{h}px does not match the {buffer_w}x{buffer_h} \
                 image aspect ratio; pass stretch to distort deliberately"
            )));
        }
        Ok(())
    }
}
