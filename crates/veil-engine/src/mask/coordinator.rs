use crate::render::RenderCtx;
use crate::scene::{same_node, NodeRef};

use super::{
    classify, AlphaFilterBackend, AreaClipBackend, MaskBackend, MaskDescriptor, MaskError,
    MaskSpec, MaskStack, MaskTechnique, StencilBackend,
};

/// Mask coordinator configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaskConfig {
    /// Allow upgrading axis-aligned rectangle masks to scissor clips.
    pub area_clip: bool,
    /// Stencil buffer width. Deeper nesting wraps; it is only reported.
    pub stencil_bits: u32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self { area_clip: true, stencil_bits: 8 }
    }
}

/// Technique → backend dispatch table.
#[derive(Debug)]
struct Backends {
    area_clip: AreaClipBackend,
    stencil: StencilBackend,
    alpha: AlphaFilterBackend,
}

impl Backends {
    fn get(&mut self, technique: MaskTechnique) -> Option<&mut dyn MaskBackend> {
        match technique {
            MaskTechnique::None => None,
            MaskTechnique::AreaClip => Some(&mut self.area_clip),
            MaskTechnique::Stencil => Some(&mut self.stencil),
            MaskTechnique::AlphaFilter => Some(&mut self.alpha),
        }
    }
}

/// Entry point for masking a subtree.
///
/// The renderer calls [`push`](Self::push) before drawing a masked node's
/// subtree and [`pop`](Self::pop) with the same target after it, strictly
/// nested. The coordinator classifies the mask, keeps the active
/// [`MaskStack`] and dispatches to the backend for the chosen technique.
///
/// # Example
///
/// ```rust,ignore
/// masks.push(&mut ctx, &node, mask_node.clone());
/// node.borrow().render(ctx.batch);
/// masks.pop(&mut ctx, &node);
/// ```
#[derive(Debug)]
pub struct MaskCoordinator {
    config: MaskConfig,
    stack: MaskStack,
    /// Free list of pooled descriptors.
    pool: Vec<MaskDescriptor>,
    backends: Backends,
}

impl Default for MaskCoordinator {
    fn default() -> Self {
        Self::new(MaskConfig::default())
    }
}

impl MaskCoordinator {
    pub fn new(config: MaskConfig) -> Self {
        Self {
            config,
            stack: MaskStack::new(),
            pool: Vec::new(),
            backends: Backends {
                area_clip: AreaClipBackend::new(),
                stencil: StencilBackend::new(config.stencil_bits),
                alpha: AlphaFilterBackend::new(),
            },
        }
    }

    #[inline]
    pub fn config(&self) -> MaskConfig {
        self.config
    }

    /// Enables or disables the scissor upgrade for future pushes.
    #[inline]
    pub fn set_area_clip(&mut self, enabled: bool) {
        self.config.area_clip = enabled;
    }

    #[inline]
    pub fn stack(&self) -> &MaskStack {
        &self.stack
    }

    /// Replaces the active stack, returning the previous one.
    ///
    /// Used when switching to a surface with its own nesting state.
    pub fn set_stack(&mut self, stack: MaskStack) -> MaskStack {
        std::mem::replace(&mut self.stack, stack)
    }

    /// Idle pooled descriptors.
    #[inline]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Active alpha-filter masks.
    #[inline]
    pub fn alpha_depth(&self) -> usize {
        self.backends.alpha.depth()
    }

    /// Sets `descriptor.technique` from its mask object. A descriptor
    /// without a mask resolves to [`MaskTechnique::None`].
    pub fn detect(&self, descriptor: &mut MaskDescriptor) {
        descriptor.technique = match &descriptor.mask {
            Some(mask) => classify(&*mask.borrow(), self.config.area_clip),
            None => MaskTechnique::None,
        };
    }

    /// Applies `mask` to the subtree of `target`.
    ///
    /// A mask resolving to [`MaskTechnique::None`] is not pushed; a later
    /// `pop` for the same target then reports a mismatch.
    pub fn push(&mut self, ctx: &mut RenderCtx<'_>, target: &NodeRef, mask: impl Into<MaskSpec>) {
        let mut descriptor = match mask.into() {
            MaskSpec::Descriptor(d) => d,
            MaskSpec::Node(node) => {
                let mut d = self.pool.pop().unwrap_or_else(|| {
                    log::debug!("mask descriptor pool empty; allocating");
                    MaskDescriptor::pooled()
                });
                d.mask = Some(node);
                d
            }
        };

        if descriptor.auto_detect || descriptor.mask.is_none() {
            self.detect(&mut descriptor);
        }

        // Filter passes render offscreen and carry no stencil/scissor nesting.
        match descriptor.technique {
            MaskTechnique::AlphaFilter => descriptor.copy_counters(None),
            _ => descriptor.copy_counters(self.stack.top()),
        }
        descriptor.target = Some(target.clone());

        let technique = descriptor.technique;
        log::trace!("mask push {technique:?} at stack length {}", self.stack.len());

        if technique == MaskTechnique::None {
            self.recycle(descriptor);
            return;
        }

        self.stack.push(descriptor);
        if let Some(backend) = self.backends.get(technique) {
            backend.push(ctx, &mut self.stack);
        }
    }

    /// Removes the innermost mask if it belongs to `target`.
    ///
    /// Nesting violations leave the stack untouched and are only logged.
    /// Returns the caller's own descriptor, reset, when one was pushed.
    pub fn pop(&mut self, ctx: &mut RenderCtx<'_>, target: &NodeRef) -> Option<MaskDescriptor> {
        match self.try_pop(ctx, target) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                log::warn!("ignoring mask pop: {err}");
                None
            }
        }
    }

    /// Like [`pop`](Self::pop) but reports nesting violations.
    pub fn try_pop(
        &mut self,
        ctx: &mut RenderCtx<'_>,
        target: &NodeRef,
    ) -> Result<Option<MaskDescriptor>, MaskError> {
        let top = self.stack.top().ok_or(MaskError::EmptyStack)?;
        if !top.target().is_some_and(|t| same_node(t, target)) {
            return Err(MaskError::TargetMismatch);
        }
        let mut descriptor = self.stack.pop().ok_or(MaskError::EmptyStack)?;

        log::trace!("mask pop {:?} to stack length {}", descriptor.technique, self.stack.len());
        if let Some(backend) = self.backends.get(descriptor.technique) {
            backend.pop(ctx, &self.stack, &descriptor);
        }

        descriptor.reset();
        if descriptor.is_pooled() {
            self.pool.push(descriptor);
            Ok(None)
        } else {
            Ok(Some(descriptor))
        }
    }

    fn recycle(&mut self, mut descriptor: MaskDescriptor) {
        descriptor.reset();
        if descriptor.is_pooled() {
            self.pool.push(descriptor);
        }
    }
}
