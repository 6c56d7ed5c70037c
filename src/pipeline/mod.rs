//! Render configuration and pipeline orchestration.
//!
//! The entry points wire the stages together in their fixed order: layout
//! inference, range normalization, grid tiling, bounded resizing, and
//! protocol encoding. Each invocation is independent and holds no state; the
//! only blocking point is the final write to the output stream. Callers
//! sharing one terminal stream across threads must serialize access to it
//! themselves, since interleaved escape bytes corrupt the decoded image.

pub mod encoder;
pub mod render_spec;

pub use render_spec::{Dimension, RenderSpec};

use crate::core::constants::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_PADDING, DEFAULT_PAD_VALUE,
};
use crate::core::{IntoRawBuffer, RenderResult};
use crate::processors::{fit_within, infer_layout, tile, Normalizer};
use crate::utils::load_image;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Fully resolved configuration for one render invocation.
///
/// Defaults come from the named constants in [`crate::core::constants`];
/// there is no process-wide mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Downsample the image so its width does not exceed this many pixels.
    pub max_w: u32,
    /// Downsample the image so its height does not exceed this many pixels.
    pub max_h: u32,
    /// Keep the original resolution, ignoring `max_w` and `max_h`.
    pub orig_res: bool,
    /// Requested render width (display hint only).
    pub render_w: Dimension,
    /// Requested render height (display hint only).
    pub render_h: Dimension,
    /// Fill the requested render box without preserving aspect ratio.
    pub stretch: bool,
    /// Grid rows for batched input; 0 derives it from the batch size.
    pub nrow: usize,
    /// Grid columns for batched input; 0 derives it from the batch size.
    pub ncol: usize,
    /// Width of the padding band between grid cells, in pixels.
    pub padding: u32,
    /// Intensity of grid padding and filler cells.
    pub pad_value: u8,
    /// Name carried in the control sequence (terminal-side download name).
    pub name: String,
    /// Content hint carried in the sequence's `type` key; empty omits it.
    pub file_type: String,
    /// Wrap the sequence in the terminal-multiplexer passthrough envelope.
    pub passthrough: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_w: DEFAULT_MAX_WIDTH,
            max_h: DEFAULT_MAX_HEIGHT,
            orig_res: false,
            render_w: Dimension::Auto,
            render_h: Dimension::Auto,
            stretch: false,
            nrow: 0,
            ncol: 0,
            padding: DEFAULT_PADDING,
            pad_value: DEFAULT_PAD_VALUE,
            name: String::new(),
            file_type: String::new(),
            passthrough: false,
        }
    }
}

impl RenderConfig {
    fn render_spec(&self) -> RenderSpec {
        RenderSpec {
            width: self.render_w,
            height: self.render_h,
            stretch: self.stretch,
        }
    }
}

/// Renders a raw numeric buffer inline on `writer`.
///
/// Runs the full pipeline: infers the axis layout from the shape, maps
/// samples to 8-bit intensities, tiles batched input into a padded grid
/// (single images skip the tiler and get no border), fits the result within
/// the configured bounds, and writes the encoded control sequence.
///
/// # Errors
///
/// Propagates every pipeline error kind; see [`crate::RenderError`].
pub fn render_buffer_to<'a, W: Write>(
    writer: &mut W,
    source: impl IntoRawBuffer<'a>,
    config: &RenderConfig,
) -> RenderResult<()> {
    let buffer = source.into_raw_buffer();
    let layout = infer_layout(buffer.shape())?;
    debug!(kind = %layout.kind(), shape = ?buffer.shape(), "inferred axis layout");

    let normalizer = Normalizer::from_buffer(&buffer);
    let mut images = normalizer.to_pixel_images(&buffer, &layout)?;

    let composite = if images.len() > 1 {
        tile(
            &images,
            config.nrow,
            config.ncol,
            config.padding,
            config.pad_value,
        )?
        .image
    } else if let Some(img) = images.pop() {
        // Single image: no grid, no border.
        img
    } else {
        return Err(crate::core::RenderError::invalid_dimension(
            "buffer produced no images",
        ));
    };

    write_encoded(writer, composite, config)
}

/// Renders an already-decoded pixel image inline on `writer`.
///
/// Skips inference and normalization and goes straight to the resize and
/// encode stages.
pub fn render_image_to<W: Write>(
    writer: &mut W,
    img: RgbImage,
    config: &RenderConfig,
) -> RenderResult<()> {
    write_encoded(writer, img, config)
}

/// Loads an image file and renders it inline on `writer`.
///
/// Any container the image codec understands is accepted; alpha is
/// flattened to RGB during loading.
pub fn render_path_to<W: Write>(
    writer: &mut W,
    path: &Path,
    config: &RenderConfig,
) -> RenderResult<()> {
    let img = load_image(path)?;
    render_image_to(writer, img, config)
}

fn write_encoded<W: Write>(
    writer: &mut W,
    img: RgbImage,
    config: &RenderConfig,
) -> RenderResult<()> {
    let fitted = fit_within(img, config.max_w, config.max_h, config.orig_res)?;
    debug!(
        width = fitted.width(),
        height = fitted.height(),
        "encoding final image"
    );

    let bytes = encoder::encode(
        &fitted,
        &config.render_spec(),
        &config.name,
        &config.file_type,
        config.passthrough,
    )?;
    writer.write_all(&bytes)?;
    writer.write_all(b"\n")?;
    Ok(())
}
