//! # tensorcat
//!
//! A Rust library and CLI that displays numeric buffers (tensors) and image
//! files inline in the terminal using the iTerm2 inline-image protocol.
//!
//! ## Features
//!
//! - Axis-layout inference for rank 2-4 buffers (HW, CHW, HWC, BHW, BCHW, BHWC)
//! - Value-range inference (unit float, byte integer, arbitrary) with
//!   automatic mapping to 8-bit intensities
//! - Grid tiling of batched inputs with configurable padding
//! - Aspect-preserving downsampling to size limits (never upscales)
//! - PNG + base64 control-sequence encoding with tmux/screen passthrough
//!
//! ## Modules
//!
//! * [`core`] - Error handling, constants, and the raw buffer abstraction
//! * [`processors`] - Layout inference, normalization, tiling, and resizing
//! * [`pipeline`] - Render configuration, orchestration, and protocol encoding
//! * [`utils`] - Image file loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tensorcat::prelude::*;
//! use ndarray::ArrayD;
//!
//! # fn main() -> Result<(), tensorcat::RenderError> {
//! // A batch of four 32x32 grayscale images in [0, 1].
//! let tensor = ArrayD::<f32>::zeros(ndarray::IxDyn(&[4, 32, 32]));
//!
//! let config = RenderConfig::default();
//! let mut stdout = std::io::stdout().lock();
//! render_buffer_to(&mut stdout, tensor, &config)?;
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline is synchronous and reentrant; it holds no state between
//! invocations. Concurrent calls must not share a single output stream
//! without external serialization, since interleaved escape bytes corrupt
//! the image on the terminal side.

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use crate::core::{RenderError, RenderResult};

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use tensorcat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{IntoRawBuffer, RawBuffer, RenderError, RenderResult};
    pub use crate::pipeline::{
        render_buffer_to, render_image_to, render_path_to, Dimension, RenderConfig, RenderSpec,
    };
    pub use crate::utils::load_image;
}
