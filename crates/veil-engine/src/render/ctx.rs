use crate::coords::Vec2;

use super::{Batcher, FilterPassSystem, FramebufferSystem, GpuContext};

/// Global render state sampled by the area-clip mapping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    /// Device pixels per logical pixel on the primary framebuffer.
    pub resolution: f32,
    /// Global translation applied by the active projection, in logical px.
    pub translation: Option<Vec2>,
    /// Primary framebuffer height in device pixels.
    pub framebuffer_height: f32,
}

impl RenderState {
    #[inline]
    pub const fn new(framebuffer_height: f32, resolution: f32) -> Self {
        Self { resolution, translation: None, framebuffer_height }
    }

    #[inline]
    pub const fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = Some(translation);
        self
    }
}

/// Borrowed collaborators for one mask push or pop.
///
/// This is intentionally small and rebuilt per call.
pub struct RenderCtx<'a> {
    pub gpu: &'a mut dyn GpuContext,
    pub batch: &'a mut dyn Batcher,
    pub framebuffer: &'a mut dyn FramebufferSystem,
    pub filter: &'a mut dyn FilterPassSystem,
    pub state: RenderState,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        gpu: &'a mut dyn GpuContext,
        batch: &'a mut dyn Batcher,
        framebuffer: &'a mut dyn FramebufferSystem,
        filter: &'a mut dyn FilterPassSystem,
        state: RenderState,
    ) -> Self {
        Self { gpu, batch, framebuffer, filter, state }
    }
}
