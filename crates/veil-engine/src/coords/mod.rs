//! Coordinate and geometry types shared by the scene and mask layers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Device space (scissor regions) is produced by the mask backends only.

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Affine;
pub use vec2::Vec2;
