//! Render-side collaborator seams consumed by the mask layer.
//!
//! The mask backends never own GPU objects. They drive:
//! - a [`GpuContext`] (fixed-function stencil / scissor / color-write state)
//! - a [`Batcher`] (draw submission, flushed after every direct mask draw)
//! - a [`FramebufferSystem`] (stencil attachment, current render target)
//! - a [`FilterPassSystem`] (offscreen passes for alpha masks)
//!
//! [`WgpuMaskState`] and [`WgpuFramebuffer`] adapt the first and third to wgpu.

mod batch;
mod ctx;
mod filter;
mod framebuffer;
mod gpu;
mod state;

pub use batch::Batcher;
pub use ctx::{RenderCtx, RenderState};
pub use filter::{FilterPass, FilterPassSystem, FilterStack};
pub use framebuffer::{FramebufferSystem, RenderTarget, StencilTexture, WgpuFramebuffer, STENCIL_FORMAT};
pub use gpu::{Capability, GpuContext, ScissorRegion};
pub use state::WgpuMaskState;
