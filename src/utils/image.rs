//! Image file loading helpers.
//!
//! Decoding of arbitrary image containers is delegated to the image codec
//! crate; this module only adapts its output to the pipeline's canonical RGB
//! form.

use crate::core::{RawBuffer, RenderResult};
use image::RgbImage;
use ndarray::{ArrayD, IxDyn};
use std::path::Path;

/// Loads an image from a file path and converts it to the canonical RGB
/// form.
///
/// Alpha channels and palettes are flattened during conversion.
///
/// # Errors
///
/// Returns [`crate::RenderError::Codec`] if the file cannot be decoded.
pub fn load_image(path: &Path) -> RenderResult<RgbImage> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}

/// Converts a pixel image into a raw HWC buffer.
///
/// Useful for pushing decoded files through the full inference pipeline
/// (for example to re-tile them) instead of the direct image path.
pub fn image_to_buffer(img: &RgbImage) -> RenderResult<RawBuffer<'static>> {
    use crate::core::IntoRawBuffer;
    use crate::core::RenderError;

    let (width, height) = img.dimensions();
    let samples: Vec<f32> = img.as_raw().iter().map(|&v| f32::from(v)).collect();
    let array = ArrayD::from_shape_vec(IxDyn(&[height as usize, width as usize, 3]), samples)
        .map_err(|e| RenderError::invalid_dimension(e.to_string()))?;
    Ok(array.into_raw_buffer())
}
