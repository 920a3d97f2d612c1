use crate::coords::Rect;
use crate::mask::SpriteMaskFilter;
use crate::scene::{NodeRef, TextureId};

/// Offscreen filter-pass seam.
///
/// `push` renders the target's subtree into an offscreen region sized by its
/// filter area (or bounds); `pop` composites it back through the filters.
pub trait FilterPassSystem {
    fn push(&mut self, target: &NodeRef, filters: &[SpriteMaskFilter]);

    fn pop(&mut self);
}

/// One recorded filter pass.
#[derive(Debug, Clone)]
pub struct FilterPass {
    pub target: NodeRef,
    /// Region the pass covers, read from the target at push time.
    pub area: Rect,
    pub resolution: f32,
    pub mask_texture: Option<TextureId>,
}

/// Recording [`FilterPassSystem`].
///
/// Tracks the active pass stack without rendering. Hosts without an
/// offscreen filter pipeline use it to observe alpha-mask nesting.
#[derive(Debug, Default)]
pub struct FilterStack {
    passes: Vec<FilterPass>,
    total_pushes: usize,
}

impl FilterStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.passes.len()
    }

    #[inline]
    pub fn passes(&self) -> &[FilterPass] {
        &self.passes
    }

    #[inline]
    pub fn total_pushes(&self) -> usize {
        self.total_pushes
    }
}

impl FilterPassSystem for FilterStack {
    fn push(&mut self, target: &NodeRef, filters: &[SpriteMaskFilter]) {
        let area = {
            let node = target.borrow();
            node.filter_area().unwrap_or_else(|| node.bounds(true))
        };
        let (resolution, mask_texture) = filters
            .first()
            .map_or((1.0, None), |f| (f.resolution(), f.texture()));

        self.total_pushes += 1;
        self.passes.push(FilterPass { target: target.clone(), area, resolution, mask_texture });
    }

    fn pop(&mut self) {
        if self.passes.pop().is_none() {
            log::warn!("filter pass pop with no active pass");
        }
    }
}
