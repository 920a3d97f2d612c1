//! Veil engine crate.
//!
//! Masking for a retained-mode 2D renderer: restricts a subtree's drawing to
//! the shape of another node using scissor rectangles, stencil buffers or
//! alpha filter passes. GPU state is expressed in wgpu terms.

pub mod coords;
pub mod logging;
pub mod mask;
pub mod render;
pub mod scene;
