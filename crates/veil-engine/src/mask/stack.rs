use super::MaskDescriptor;

/// Ordered stack of active masks, innermost last.
///
/// Owned by [`MaskCoordinator`](super::MaskCoordinator) and lent to the
/// backends for each push/pop so all of them observe the same nesting.
#[derive(Debug, Clone, Default)]
pub struct MaskStack {
    entries: Vec<MaskDescriptor>,
}

impl MaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Innermost active mask.
    #[inline]
    pub fn top(&self) -> Option<&MaskDescriptor> {
        self.entries.last()
    }

    #[inline]
    pub(crate) fn top_mut(&mut self) -> Option<&mut MaskDescriptor> {
        self.entries.last_mut()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &MaskDescriptor> {
        self.entries.iter()
    }

    #[inline]
    pub(crate) fn push(&mut self, descriptor: MaskDescriptor) {
        self.entries.push(descriptor);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<MaskDescriptor> {
        self.entries.pop()
    }

    /// Active stencil masks, read from the innermost descriptor.
    #[inline]
    pub fn stencil_depth(&self) -> u32 {
        self.top().map_or(0, MaskDescriptor::stencil_depth)
    }

    /// Active area clips, read from the innermost descriptor.
    #[inline]
    pub fn area_clip_depth(&self) -> u32 {
        self.top().map_or(0, MaskDescriptor::area_clip_depth)
    }
}
