//! Utility functions for image loading and conversion.

pub mod image;

pub use image::{image_to_buffer, load_image};
