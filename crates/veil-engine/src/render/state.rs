use wgpu::{ColorWrites, CompareFunction, StencilFaceState, StencilOperation, StencilState};

use super::{Capability, GpuContext, ScissorRegion};

/// [`GpuContext`] that records fixed-function state for wgpu.
///
/// wgpu bakes stencil and color-write state into pipelines and sets the
/// stencil reference and scissor per render pass. This tracker accumulates
/// what the mask backends ask for and exposes it in those terms:
/// - pipeline creation reads [`color_writes`](Self::color_writes) and
///   [`stencil_state`](Self::stencil_state)
/// - pass setup calls [`take_stencil_ops`](Self::take_stencil_ops) and
///   [`apply`](Self::apply)
#[derive(Debug, Clone)]
pub struct WgpuMaskState {
    stencil_test: bool,
    scissor_test: bool,
    color_writes: ColorWrites,
    stencil_face: StencilFaceState,
    stencil_reference: u32,
    stencil_read_mask: u32,
    scissor: Option<ScissorRegion>,
    pending_stencil_clear: Option<u32>,
}

impl Default for WgpuMaskState {
    fn default() -> Self {
        Self {
            stencil_test: false,
            scissor_test: false,
            color_writes: ColorWrites::ALL,
            stencil_face: StencilFaceState::IGNORE,
            stencil_reference: 0,
            stencil_read_mask: !0,
            scissor: None,
            pending_stencil_clear: None,
        }
    }
}

impl WgpuMaskState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn stencil_test_enabled(&self) -> bool {
        self.stencil_test
    }

    #[inline]
    pub fn scissor_test_enabled(&self) -> bool {
        self.scissor_test
    }

    #[inline]
    pub fn color_writes(&self) -> ColorWrites {
        self.color_writes
    }

    #[inline]
    pub fn stencil_reference(&self) -> u32 {
        self.stencil_reference
    }

    #[inline]
    pub fn stencil_read_mask(&self) -> u32 {
        self.stencil_read_mask
    }

    #[inline]
    pub fn stencil_face(&self) -> StencilFaceState {
        self.stencil_face
    }

    /// Last region passed to [`GpuContext::scissor`], regardless of enable state.
    #[inline]
    pub fn scissor_region(&self) -> Option<ScissorRegion> {
        self.scissor
    }

    /// Stencil state for pipeline creation. A disabled test yields the
    /// pass-through default.
    pub fn stencil_state(&self) -> StencilState {
        if !self.stencil_test {
            return StencilState::default();
        }
        StencilState {
            front: self.stencil_face,
            back: self.stencil_face,
            read_mask: self.stencil_read_mask,
            write_mask: !0,
        }
    }

    /// Scissor rect in wgpu's top-left convention, clamped to `target`.
    ///
    /// `flip_y` converts from the bottom-left device convention used when the
    /// primary framebuffer was targeted; offscreen regions are already top-left.
    /// With the test disabled the whole target is returned.
    pub fn scissor_rect(&self, target: (u32, u32), flip_y: bool) -> (u32, u32, u32, u32) {
        let (tw, th) = target;
        let region = match self.scissor {
            Some(r) if self.scissor_test => r,
            _ => return (0, 0, tw, th),
        };

        let top = if flip_y {
            th as i64 - (region.y as i64 + region.height as i64)
        } else {
            region.y as i64
        };

        let x0 = (region.x as i64).clamp(0, tw as i64);
        let y0 = top.clamp(0, th as i64);
        let x1 = (region.x as i64 + region.width as i64).clamp(0, tw as i64);
        let y1 = (top + region.height as i64).clamp(0, th as i64);

        (x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    /// Stencil attachment ops for the next pass; consumes a pending clear.
    pub fn take_stencil_ops(&mut self) -> wgpu::Operations<u32> {
        let load = match self.pending_stencil_clear.take() {
            Some(value) => wgpu::LoadOp::Clear(value),
            None => wgpu::LoadOp::Load,
        };
        wgpu::Operations { load, store: wgpu::StoreOp::Store }
    }

    /// Sets the per-pass dynamic state (stencil reference and scissor).
    pub fn apply(&self, rpass: &mut wgpu::RenderPass<'_>, target: (u32, u32), flip_y: bool) {
        rpass.set_stencil_reference(self.stencil_reference);
        let (x, y, w, h) = self.scissor_rect(target, flip_y);
        rpass.set_scissor_rect(x, y, w, h);
    }
}

impl GpuContext for WgpuMaskState {
    fn enable(&mut self, cap: Capability) {
        match cap {
            Capability::StencilTest => self.stencil_test = true,
            Capability::ScissorTest => self.scissor_test = true,
        }
    }

    fn disable(&mut self, cap: Capability) {
        match cap {
            Capability::StencilTest => self.stencil_test = false,
            Capability::ScissorTest => self.scissor_test = false,
        }
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        let mut writes = ColorWrites::empty();
        writes.set(ColorWrites::RED, r);
        writes.set(ColorWrites::GREEN, g);
        writes.set(ColorWrites::BLUE, b);
        writes.set(ColorWrites::ALPHA, a);
        self.color_writes = writes;
    }

    fn stencil_func(&mut self, compare: CompareFunction, reference: u32, read_mask: u32) {
        self.stencil_face.compare = compare;
        self.stencil_reference = reference;
        self.stencil_read_mask = read_mask;
    }

    fn stencil_op(&mut self, fail: StencilOperation, depth_fail: StencilOperation, pass: StencilOperation) {
        self.stencil_face.fail_op = fail;
        self.stencil_face.depth_fail_op = depth_fail;
        self.stencil_face.pass_op = pass;
    }

    fn clear_stencil(&mut self, value: u32) {
        self.pending_stencil_clear = Some(value);
    }

    fn scissor(&mut self, region: ScissorRegion) {
        self.scissor = Some(region);
    }
}
