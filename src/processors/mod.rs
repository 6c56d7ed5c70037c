//! Buffer and pixel processing stages of the render pipeline.
//!
//! The stages run strictly in order:
//! layout inference ([`layout`]) -> range normalization ([`normalize`]) ->
//! grid tiling ([`tile`]) -> bounded resizing ([`resize`]).

pub mod layout;
pub mod normalize;
pub mod resize;
pub mod tile;

pub use layout::{infer_layout, AxisRole, Layout, LayoutKind};
pub use normalize::{Normalizer, ValueRange};
pub use resize::fit_within;
pub use tile::{grid_shape, tile, ImageGrid};
