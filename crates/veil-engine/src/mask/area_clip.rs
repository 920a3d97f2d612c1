use crate::coords::Rect;
use crate::render::{Capability, RenderCtx, RenderState, RenderTarget, ScissorRegion};
use crate::scene::with_renderable;

use super::{MaskBackend, MaskDescriptor, MaskStack};

/// Scissor-rectangle masking.
///
/// Nested clips compose by intersection: each push fits the new bounds into
/// the rectangle inherited from the enclosing clip, so the visible region
/// only ever shrinks.
#[derive(Debug, Default)]
pub struct AreaClipBackend;

impl AreaClipBackend {
    pub fn new() -> Self {
        Self
    }

    fn use_rect(ctx: &mut RenderCtx<'_>, rect: Rect) {
        let region = device_region(rect, &ctx.state, ctx.framebuffer.current_target());
        log::trace!("area clip {rect:?} -> {region:?}");
        ctx.gpu.scissor(region);
    }
}

impl MaskBackend for AreaClipBackend {
    fn push(&mut self, ctx: &mut RenderCtx<'_>, stack: &mut MaskStack) {
        let Some(top) = stack.top_mut() else { return };
        let Some(mask) = top.mask.clone() else { return };

        let bounds = with_renderable(&mask, |node| node.bounds(true));
        let rect = match top.area_rect {
            Some(enclosing) => bounds.fit(enclosing),
            None => bounds,
        };

        if top.area_clip_depth == 0 {
            ctx.gpu.enable(Capability::ScissorTest);
        }
        top.area_clip_depth += 1;
        top.area_rect = Some(rect);

        Self::use_rect(ctx, rect);
    }

    fn pop(&mut self, ctx: &mut RenderCtx<'_>, stack: &MaskStack, _popped: &MaskDescriptor) {
        let enclosing = stack
            .top()
            .filter(|d| d.area_clip_depth() > 0)
            .and_then(MaskDescriptor::area_rect);

        match enclosing {
            Some(rect) => Self::use_rect(ctx, rect),
            None => ctx.gpu.disable(Capability::ScissorTest),
        }
    }
}

/// Maps a logical clip rectangle to a device scissor region.
///
/// The global translation is added first, then the target's resolution is
/// applied. The primary framebuffer has a bottom-left origin, so `y` is
/// flipped against its height; offscreen targets are not flipped.
pub fn device_region(rect: Rect, state: &RenderState, target: RenderTarget) -> ScissorRegion {
    let mut x = rect.origin.x;
    let mut y = rect.origin.y;
    if let Some(t) = state.translation {
        x += t.x;
        y += t.y;
    }

    let (resolution, device_y) = match target {
        RenderTarget::Offscreen { resolution } => (resolution, y * resolution),
        RenderTarget::Primary => (
            state.resolution,
            state.framebuffer_height - (y + rect.size.y) * state.resolution,
        ),
    };

    ScissorRegion::from_device(
        x * resolution,
        device_y,
        rect.size.x * resolution,
        rect.size.y * resolution,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::mask::test_support::{push_descriptor, rect_mask, target, Harness};
    use crate::mask::MaskTechnique;

    #[test]
    fn primary_target_flips_y() {
        let state = RenderState::new(600.0, 1.0);
        let region = device_region(Rect::new(10.0, 20.0, 30.0, 40.0), &state, RenderTarget::Primary);
        assert_eq!(region, ScissorRegion::new(10, 540, 30, 40));
    }

    #[test]
    fn primary_target_scales_by_resolution() {
        let state = RenderState::new(1200.0, 2.0);
        let region = device_region(Rect::new(10.0, 20.0, 30.0, 40.0), &state, RenderTarget::Primary);
        // 1200 - (20 + 40) * 2
        assert_eq!(region, ScissorRegion::new(20, 1080, 60, 80));
    }

    #[test]
    fn translation_is_applied_before_scaling() {
        let state = RenderState::new(600.0, 2.0).with_translation(Vec2::new(5.0, -10.0));
        let region = device_region(Rect::new(10.0, 20.0, 30.0, 40.0), &state, RenderTarget::Primary);
        // x = (10 + 5) * 2, y = 600 - (10 + 40) * 2
        assert_eq!(region, ScissorRegion::new(30, 500, 60, 80));
    }

    #[test]
    fn offscreen_target_uses_own_resolution_without_flip() {
        let state = RenderState::new(600.0, 1.0);
        let target = RenderTarget::Offscreen { resolution: 0.5 };
        let region = device_region(Rect::new(10.0, 20.0, 30.0, 40.0), &state, target);
        assert_eq!(region, ScissorRegion::new(5, 10, 15, 20));
    }

    #[test]
    fn nested_push_intersects_and_pop_restores() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mut backend = AreaClipBackend::new();
        let t = target();

        push_descriptor(&mut stack, rect_mask(0.0, 0.0, 100.0, 100.0), MaskTechnique::AreaClip, &t);
        backend.push(&mut h.ctx(), &mut stack);
        push_descriptor(&mut stack, rect_mask(50.0, 50.0, 100.0, 100.0), MaskTechnique::AreaClip, &t);
        backend.push(&mut h.ctx(), &mut stack);

        let top = stack.top().unwrap();
        assert_eq!(top.area_clip_depth(), 2);
        assert_eq!(top.area_rect(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(h.gpu.state.scissor_region(), Some(ScissorRegion::new(50, 500, 50, 50)));

        let popped = stack.pop().unwrap();
        backend.pop(&mut h.ctx(), &stack, &popped);
        assert!(h.gpu.state.scissor_test_enabled());
        assert_eq!(h.gpu.state.scissor_region(), Some(ScissorRegion::new(0, 500, 100, 100)));

        let popped = stack.pop().unwrap();
        backend.pop(&mut h.ctx(), &stack, &popped);
        assert!(!h.gpu.state.scissor_test_enabled());
    }

    #[test]
    fn bounds_query_leaves_mask_hidden() {
        let mut h = Harness::new();
        let mut stack = MaskStack::new();
        let mask = rect_mask(0.0, 0.0, 10.0, 10.0);

        push_descriptor(&mut stack, mask.clone(), MaskTechnique::AreaClip, &target());
        AreaClipBackend::new().push(&mut h.ctx(), &mut stack);

        assert!(!mask.borrow().renderable());
        assert!(h.batch.flushed().is_empty());
    }
}
