//! Masking: restricting a subtree's drawing to the region of another node.
//!
//! [`MaskCoordinator`] is the entry point. Per mask it picks the cheapest
//! technique that is still exact:
//!
//! - [`MaskTechnique::AreaClip`]: scissor rectangle, for rectangles that stay
//!   axis-aligned on screen
//! - [`MaskTechnique::Stencil`]: stencil buffer, any vector shape
//! - [`MaskTechnique::AlphaFilter`]: offscreen filter pass, image alpha
//!
//! Push/pop must be strictly LIFO, matching the scene traversal.

mod alpha;
mod area_clip;
mod backend;
mod coordinator;
mod descriptor;
mod detect;
mod error;
mod stack;
mod stencil;

#[cfg(test)]
pub(crate) mod test_support;

pub use alpha::{AlphaFilterBackend, SpriteMaskFilter};
pub use area_clip::{device_region, AreaClipBackend};
pub use backend::MaskBackend;
pub use coordinator::{MaskConfig, MaskCoordinator};
pub use descriptor::{MaskDescriptor, MaskSpec, MaskTechnique};
pub use detect::classify;
pub use error::MaskError;
pub use stack::MaskStack;
pub use stencil::{stencil_bitmask, StencilBackend};
