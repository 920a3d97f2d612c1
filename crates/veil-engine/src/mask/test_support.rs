//! Recording collaborators and node builders for mask tests.

use wgpu::{CompareFunction, StencilOperation};

use crate::coords::{Affine, Rect, Vec2};
use crate::render::{
    Capability, FilterStack, FramebufferSystem, GpuContext, RenderCtx, RenderState, RenderTarget,
    ScissorRegion, WgpuMaskState,
};
use crate::scene::{node_ref, DrawList, NodeRef, Shape, ShapeNode, SpriteNode, TextureId};

use super::{MaskDescriptor, MaskStack, MaskTechnique};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GpuCall {
    Enable(Capability),
    Disable(Capability),
    ColorMask(bool, bool, bool, bool),
    StencilFunc(CompareFunction, u32, u32),
    StencilOp(StencilOperation, StencilOperation, StencilOperation),
    ClearStencil(u32),
    Scissor(ScissorRegion),
}

/// Forwards to a real [`WgpuMaskState`] and keeps the call log.
#[derive(Debug, Default)]
pub struct RecordingGpu {
    pub state: WgpuMaskState,
    pub calls: Vec<GpuCall>,
}

impl GpuContext for RecordingGpu {
    fn enable(&mut self, cap: Capability) {
        self.calls.push(GpuCall::Enable(cap));
        self.state.enable(cap);
    }

    fn disable(&mut self, cap: Capability) {
        self.calls.push(GpuCall::Disable(cap));
        self.state.disable(cap);
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.calls.push(GpuCall::ColorMask(r, g, b, a));
        self.state.color_mask(r, g, b, a);
    }

    fn stencil_func(&mut self, compare: CompareFunction, reference: u32, read_mask: u32) {
        self.calls.push(GpuCall::StencilFunc(compare, reference, read_mask));
        self.state.stencil_func(compare, reference, read_mask);
    }

    fn stencil_op(&mut self, fail: StencilOperation, depth_fail: StencilOperation, pass: StencilOperation) {
        self.calls.push(GpuCall::StencilOp(fail, depth_fail, pass));
        self.state.stencil_op(fail, depth_fail, pass);
    }

    fn clear_stencil(&mut self, value: u32) {
        self.calls.push(GpuCall::ClearStencil(value));
        self.state.clear_stencil(value);
    }

    fn scissor(&mut self, region: ScissorRegion) {
        self.calls.push(GpuCall::Scissor(region));
        self.state.scissor(region);
    }
}

#[derive(Debug)]
pub struct TestFramebuffer {
    pub stencil_forced: usize,
    pub target: RenderTarget,
}

impl Default for TestFramebuffer {
    fn default() -> Self {
        Self { stencil_forced: 0, target: RenderTarget::Primary }
    }
}

impl FramebufferSystem for TestFramebuffer {
    fn force_stencil(&mut self) {
        self.stencil_forced += 1;
    }

    fn current_target(&self) -> RenderTarget {
        self.target
    }
}

/// Owns one of each collaborator; [`ctx`](Self::ctx) lends them out.
pub struct Harness {
    pub gpu: RecordingGpu,
    pub batch: DrawList,
    pub framebuffer: TestFramebuffer,
    pub filter: FilterStack,
    pub state: RenderState,
}

impl Harness {
    /// 600 device px tall primary target at resolution 1.
    pub fn new() -> Self {
        Self {
            gpu: RecordingGpu::default(),
            batch: DrawList::new(),
            framebuffer: TestFramebuffer::default(),
            filter: FilterStack::new(),
            state: RenderState::new(600.0, 1.0),
        }
    }

    pub fn ctx(&mut self) -> RenderCtx<'_> {
        RenderCtx::new(
            &mut self.gpu,
            &mut self.batch,
            &mut self.framebuffer,
            &mut self.filter,
            self.state,
        )
    }
}

/// Visible node that masks are applied to.
pub fn target() -> NodeRef {
    node_ref(ShapeNode::rect(Rect::new(0.0, 0.0, 200.0, 200.0)))
}

pub fn rect_mask(x: f32, y: f32, w: f32, h: f32) -> NodeRef {
    node_ref(ShapeNode::rect(Rect::new(x, y, w, h)).hidden())
}

pub fn circle_mask(cx: f32, cy: f32, radius: f32) -> NodeRef {
    node_ref(
        ShapeNode::new()
            .with_shape(Shape::Circle { center: Vec2::new(cx, cy), radius })
            .hidden(),
    )
}

/// 16x16 sprite with its top-left corner at `(x, y)`.
pub fn sprite_mask(texture: u32, x: f32, y: f32) -> NodeRef {
    node_ref(
        SpriteNode::new(TextureId(texture), Vec2::new(16.0, 16.0))
            .with_transform(Affine::translate(x, y))
            .hidden(),
    )
}

/// Pushes a descriptor the way the coordinator does, without dispatching.
pub fn push_descriptor(stack: &mut MaskStack, mask: NodeRef, technique: MaskTechnique, target: &NodeRef) {
    let mut d = MaskDescriptor::with_technique(mask, technique);
    match technique {
        MaskTechnique::AlphaFilter => d.copy_counters(None),
        _ => d.copy_counters(stack.top()),
    }
    d.target = Some(target.clone());
    stack.push(d);
}
