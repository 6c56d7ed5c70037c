//! Bounded downsampling of pixel images.
//!
//! Fits an image within a (max_w, max_h) bound by scaling both axes with the
//! same factor, so the aspect ratio is preserved. The factor is clamped to 1:
//! this stage never upscales. Resampling uses the Triangle (bilinear) filter;
//! nearest-neighbor is deliberately not offered since it degrades small text
//! and fine structure.

use crate::core::{RenderError, RenderResult};
use image::{imageops, RgbImage};
use tracing::debug;

/// Downsamples `img` so both dimensions fit within `(max_w, max_h)`.
///
/// With `orig_res` set, or when the image already fits, it is returned
/// unchanged. Resulting dimensions are each at least 1.
///
/// # Errors
///
/// Returns [`RenderError::InvalidDimension`] when a resize is required but
/// either bound is zero.
pub fn fit_within(img: RgbImage, max_w: u32, max_h: u32, orig_res: bool) -> RenderResult<RgbImage> {
    if orig_res {
        return Ok(img);
    }

    let (width, height) = img.dimensions();
    if width <= max_w && height <= max_h {
        return Ok(img);
    }

    if max_w == 0 || max_h == 0 {
        return Err(RenderError::invalid_dimension(format!(
            "cannot fit {width}x{height} image within {max_w}x{max_h}"
        )));
    }

    let factor = (f64::from(max_w) / f64::from(width))
        .min(f64::from(max_h) / f64::from(height))
        .min(1.0);
    let new_w = ((f64::from(width) * factor).round() as u32).max(1);
    let new_h = ((f64::from(height) * factor).round() as u32).max(1);

    debug!(
        from_width = width,
        from_height = height,
        to_width = new_w,
        to_height = new_h,
        "downsampling image to fit bounds"
    );

    Ok(imageops::resize(
        &img,
        new_w,
        new_h,
        imageops::FilterType::Triangle,
    ))
}
