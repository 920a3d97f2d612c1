use crate::render::RenderCtx;

use super::{MaskDescriptor, MaskStack};

/// Uniform push/pop interface shared by the mask techniques.
pub trait MaskBackend {
    /// Applies the innermost descriptor of `stack`, which the coordinator has
    /// just pushed with its counters inherited.
    fn push(&mut self, ctx: &mut RenderCtx<'_>, stack: &mut MaskStack);

    /// Reverts `popped`, already removed from `stack`.
    fn pop(&mut self, ctx: &mut RenderCtx<'_>, stack: &MaskStack, popped: &MaskDescriptor);
}
