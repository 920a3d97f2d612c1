use wgpu::{CompareFunction, StencilOperation};

use crate::render::{Capability, RenderCtx};
use crate::scene::{with_renderable, NodeRef};

use super::{MaskBackend, MaskDescriptor, MaskStack};

/// Read mask covering exactly `depth` low bits: `(1 << depth) - 1`.
///
/// Depths past 32 bits wrap instead of panicking; real stencil buffers are
/// usually 8 bits, so nesting beyond that is an accepted limit.
#[inline]
pub fn stencil_bitmask(depth: u32) -> u32 {
    1u32.checked_shl(depth).unwrap_or(0).wrapping_sub(1)
}

/// Stencil-buffer masking with per-depth reference counting.
///
/// Pushing mask N increments the stencil value from N-1 to N inside the
/// mask shape only where it already equals N-1, so a pixel reaches depth N
/// only if every enclosing mask covers it. Content is then drawn where the
/// value equals the current depth.
#[derive(Debug)]
pub struct StencilBackend {
    bits: u32,
    warned_overflow: bool,
}

impl Default for StencilBackend {
    fn default() -> Self {
        Self::new(8)
    }
}

impl StencilBackend {
    /// `bits` is the stencil buffer width, only used for diagnostics.
    pub fn new(bits: u32) -> Self {
        Self { bits, warned_overflow: false }
    }

    /// Stencil masks active in `stack`.
    #[inline]
    pub fn active_mask_count(stack: &MaskStack) -> u32 {
        stack.stencil_depth()
    }

    /// Draws `mask` with whatever stencil state is current, then flushes so
    /// the state cannot leak into batched draws.
    fn draw_mask(ctx: &mut RenderCtx<'_>, mask: &NodeRef) {
        with_renderable(mask, |node| node.render(&mut *ctx.batch));
        ctx.batch.flush();
    }

    /// Normal drawing at `depth`: color on, equality test, stencil untouched.
    fn use_current(ctx: &mut RenderCtx<'_>, depth: u32) {
        ctx.gpu.color_mask(true, true, true, true);
        ctx.gpu.stencil_func(CompareFunction::Equal, depth, stencil_bitmask(depth));
        ctx.gpu.stencil_op(StencilOperation::Keep, StencilOperation::Keep, StencilOperation::Keep);
    }
}

impl MaskBackend for StencilBackend {
    fn push(&mut self, ctx: &mut RenderCtx<'_>, stack: &mut MaskStack) {
        let Some(top) = stack.top_mut() else { return };
        let Some(mask) = top.mask.clone() else { return };

        let prev = top.stencil_depth;
        if prev == 0 {
            ctx.framebuffer.force_stencil();
            ctx.gpu.enable(Capability::StencilTest);
        }

        top.stencil_depth += 1;
        let depth = top.stencil_depth;
        if depth > self.bits && !self.warned_overflow {
            log::warn!("stencil mask depth {depth} exceeds {} stencil bits; nesting will wrap", self.bits);
            self.warned_overflow = true;
        }
        log::trace!("stencil push -> depth {depth}");

        ctx.gpu.color_mask(false, false, false, false);
        ctx.gpu.stencil_func(CompareFunction::Equal, prev, stencil_bitmask(depth));
        ctx.gpu.stencil_op(
            StencilOperation::Keep,
            StencilOperation::Keep,
            StencilOperation::IncrementClamp,
        );
        Self::draw_mask(ctx, &mask);

        Self::use_current(ctx, depth);
    }

    fn pop(&mut self, ctx: &mut RenderCtx<'_>, stack: &MaskStack, popped: &MaskDescriptor) {
        let depth = Self::active_mask_count(stack);
        log::trace!("stencil pop -> depth {depth}");

        if depth == 0 {
            ctx.gpu.disable(Capability::StencilTest);
            ctx.gpu.clear_stencil(0);
            return;
        }

        // Undo the popped mask's increment; the equality test from the last
        // push still selects exactly its pixels.
        ctx.gpu.color_mask(false, false, false, false);
        ctx.gpu.stencil_op(
            StencilOperation::Keep,
            StencilOperation::Keep,
            StencilOperation::DecrementClamp,
        );
        if let Some(mask) = &popped.mask {
            Self::draw_mask(ctx, mask);
        }

        Self::use_current(ctx, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::test_support::{circle_mask, push_descriptor, target, GpuCall, Harness};
    use crate::mask::MaskTechnique;

    #[test]
    fn bitmask_covers_depth_bits() {
        assert_eq!(stencil_bitmask(0), 0);
        assert_eq!(stencil_bitmask(1), 0b1);
        assert_eq!(stencil_bitmask(3), 0b111);
        assert_eq!(stencil_bitmask(8), 0xff);
        assert_eq!(stencil_bitmask(32), u32::MAX);
    }

    #[test]
    fn first_push_forces_stencil_and_draws_mask() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mask = circle_mask(10.0, 10.0, 5.0);

        push_descriptor(&mut stack, mask.clone(), MaskTechnique::Stencil, &target());
        StencilBackend::default().push(&mut h.ctx(), &mut stack);

        assert_eq!(h.framebuffer.stencil_forced, 1);
        assert_eq!(stack.top().unwrap().stencil_depth(), 1);
        assert_eq!(h.batch.flushed().len(), 1);
        assert!(!mask.borrow().renderable());

        // mask write, then the content state
        assert!(h.gpu.calls.contains(&GpuCall::StencilFunc(CompareFunction::Equal, 0, 0b1)));
        assert!(h.gpu.calls.contains(&GpuCall::StencilOp(
            StencilOperation::Keep,
            StencilOperation::Keep,
            StencilOperation::IncrementClamp,
        )));
        assert!(h.gpu.state.stencil_test_enabled());
        assert_eq!(h.gpu.state.stencil_reference(), 1);
        assert_eq!(h.gpu.state.stencil_face().pass_op, StencilOperation::Keep);
        assert_eq!(h.gpu.state.color_writes(), wgpu::ColorWrites::ALL);
    }

    #[test]
    fn nested_push_compares_against_previous_depth() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mut backend = StencilBackend::default();
        let t = target();

        for _ in 0..2 {
            push_descriptor(&mut stack, circle_mask(0.0, 0.0, 4.0), MaskTechnique::Stencil, &t);
            backend.push(&mut h.ctx(), &mut stack);
        }
        h.gpu.calls.clear();
        push_descriptor(&mut stack, circle_mask(0.0, 0.0, 4.0), MaskTechnique::Stencil, &t);
        backend.push(&mut h.ctx(), &mut stack);

        assert_eq!(h.framebuffer.stencil_forced, 1);
        assert_eq!(h.gpu.calls[1], GpuCall::StencilFunc(CompareFunction::Equal, 2, 0b111));
        assert_eq!(h.gpu.state.stencil_reference(), 3);
        assert_eq!(h.gpu.state.stencil_read_mask(), 0b111);
    }

    #[test]
    fn nesting_past_bit_width_warns_once_and_keeps_counting() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mut backend = StencilBackend::new(2);
        let t = target();

        for depth in 1..=4u32 {
            push_descriptor(&mut stack, circle_mask(0.0, 0.0, 4.0), MaskTechnique::Stencil, &t);
            backend.push(&mut h.ctx(), &mut stack);

            assert_eq!(backend.warned_overflow, depth > 2, "depth {depth}");
            assert_eq!(stack.top().unwrap().stencil_depth(), depth);
            assert_eq!(h.gpu.state.stencil_reference(), depth);
            assert_eq!(h.gpu.state.stencil_read_mask(), (1 << depth) - 1);
        }

        for depth in (0..4u32).rev() {
            let popped = stack.pop().unwrap();
            backend.pop(&mut h.ctx(), &stack, &popped);
            assert_eq!(StencilBackend::active_mask_count(&stack), depth);
            if depth > 0 {
                assert_eq!(h.gpu.state.stencil_reference(), depth);
                assert_eq!(h.gpu.state.stencil_read_mask(), stencil_bitmask(depth));
            }
        }
        assert!(!h.gpu.state.stencil_test_enabled());
        assert!(backend.warned_overflow);
    }

    #[test]
    fn inner_pop_decrements_under_popped_mask() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mut backend = StencilBackend::default();
        let t = target();
        let inner = circle_mask(3.0, 3.0, 2.0);

        push_descriptor(&mut stack, circle_mask(0.0, 0.0, 9.0), MaskTechnique::Stencil, &t);
        backend.push(&mut h.ctx(), &mut stack);
        push_descriptor(&mut stack, inner.clone(), MaskTechnique::Stencil, &t);
        backend.push(&mut h.ctx(), &mut stack);

        h.gpu.calls.clear();
        h.batch.clear();
        let popped = stack.pop().unwrap();
        backend.pop(&mut h.ctx(), &stack, &popped);

        assert!(h.gpu.calls.contains(&GpuCall::StencilOp(
            StencilOperation::Keep,
            StencilOperation::Keep,
            StencilOperation::DecrementClamp,
        )));
        assert_eq!(h.batch.flushed().len(), 1);
        assert!(h.gpu.state.stencil_test_enabled());
        assert_eq!(h.gpu.state.stencil_reference(), 1);
        assert_eq!(h.gpu.state.stencil_read_mask(), 0b1);
        assert!(!inner.borrow().renderable());
    }

    #[test]
    fn last_pop_disables_and_clears() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mut backend = StencilBackend::default();

        push_descriptor(&mut stack, circle_mask(0.0, 0.0, 9.0), MaskTechnique::Stencil, &target());
        backend.push(&mut h.ctx(), &mut stack);
        h.batch.clear();

        let popped = stack.pop().unwrap();
        backend.pop(&mut h.ctx(), &stack, &popped);

        assert!(!h.gpu.state.stencil_test_enabled());
        assert!(h.gpu.calls.ends_with(&[
            GpuCall::Disable(Capability::StencilTest),
            GpuCall::ClearStencil(0),
        ]));
        assert!(h.batch.flushed().is_empty());
        assert_eq!(h.gpu.state.take_stencil_ops().load, wgpu::LoadOp::Clear(0));
    }
}
