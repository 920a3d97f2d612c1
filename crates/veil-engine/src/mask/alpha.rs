use crate::render::RenderCtx;
use crate::scene::{NodeRef, TextureId};

use super::{MaskBackend, MaskDescriptor, MaskStack};

/// Filter that multiplies a pass by a sprite's alpha channel.
#[derive(Debug, Clone)]
pub struct SpriteMaskFilter {
    mask_sprite: Option<NodeRef>,
    texture: Option<TextureId>,
    resolution: f32,
}

impl Default for SpriteMaskFilter {
    fn default() -> Self {
        Self { mask_sprite: None, texture: None, resolution: 1.0 }
    }
}

impl SpriteMaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask_sprite(&self) -> Option<&NodeRef> {
        self.mask_sprite.as_ref()
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    fn bind(&mut self, sprite: &NodeRef, resolution: f32) {
        self.texture = sprite.borrow().texture();
        self.mask_sprite = Some(sprite.clone());
        self.resolution = resolution;
    }

    fn release(&mut self) {
        self.mask_sprite = None;
        self.texture = None;
    }
}

/// Alpha masking through offscreen filter passes.
///
/// Keeps one [`SpriteMaskFilter`] per nesting level; slots are reused across
/// frames and only released (not freed) on pop.
#[derive(Debug, Default)]
pub struct AlphaFilterBackend {
    pool: Vec<SpriteMaskFilter>,
    index: usize,
}

impl AlphaFilterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active alpha masks.
    #[inline]
    pub fn depth(&self) -> usize {
        self.index
    }

    /// Allocated filter slots.
    #[inline]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }
}

impl MaskBackend for AlphaFilterBackend {
    fn push(&mut self, ctx: &mut RenderCtx<'_>, stack: &mut MaskStack) {
        let Some(top) = stack.top() else { return };
        let (Some(mask), Some(target)) = (top.mask.clone(), top.target.clone()) else {
            return;
        };

        if self.index == self.pool.len() {
            log::debug!("alpha mask filter pool grew to {}", self.index + 1);
            self.pool.push(SpriteMaskFilter::new());
        }
        let filter = &mut self.pool[self.index];
        filter.bind(&mask, ctx.state.resolution);

        // The pass only needs to cover the mask, not the whole target.
        let mask_bounds = mask.borrow().bounds(true);
        let stashed = target.borrow().filter_area();
        target.borrow_mut().set_filter_area(Some(mask_bounds));
        ctx.filter.push(&target, std::slice::from_ref(filter));
        target.borrow_mut().set_filter_area(stashed);

        self.index += 1;
        log::trace!("alpha mask push -> depth {}", self.index);
    }

    fn pop(&mut self, ctx: &mut RenderCtx<'_>, _stack: &MaskStack, popped: &MaskDescriptor) {
        // Mirrors the early return in `push`: no pass was opened for it.
        if popped.mask.is_none() || popped.target.is_none() {
            return;
        }
        let Some(index) = self.index.checked_sub(1) else {
            log::warn!("alpha mask pop with no active filter pass");
            return;
        };

        ctx.filter.pop();
        self.pool[index].release();
        self.index = index;
        log::trace!("alpha mask pop -> depth {}", self.index);
    }
}
