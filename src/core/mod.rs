//! The core module of the render pipeline.
//!
//! This module contains the fundamental building blocks shared by every
//! pipeline stage:
//! - Named default constants
//! - Error handling
//! - The raw N-dimensional buffer abstraction and its source adapters
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod buffer;
pub mod constants;
pub mod errors;

pub use buffer::{IntoRawBuffer, RawBuffer};
pub use constants::*;
pub use errors::{RenderError, RenderResult};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging; the library itself never installs a subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
