use crate::coords::Rect;
use crate::scene::NodeRef;

/// How a mask restricts drawing.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MaskTechnique {
    /// Contributes nothing; never enters the stack.
    #[default]
    None,
    AreaClip,
    Stencil,
    AlphaFilter,
}

/// One pending or active mask.
///
/// Depth counters and the area rect are inherited from the descriptor below
/// at push time and only meaningful between push and pop.
#[derive(Debug, Clone)]
pub struct MaskDescriptor {
    pub technique: MaskTechnique,
    /// Classify on push instead of trusting `technique`.
    pub auto_detect: bool,
    pub mask: Option<NodeRef>,
    pooled: bool,
    pub(crate) stencil_depth: u32,
    pub(crate) area_clip_depth: u32,
    pub(crate) area_rect: Option<Rect>,
    pub(crate) target: Option<NodeRef>,
}

impl Default for MaskDescriptor {
    fn default() -> Self {
        Self {
            technique: MaskTechnique::None,
            auto_detect: true,
            mask: None,
            pooled: false,
            stencil_depth: 0,
            area_clip_depth: 0,
            area_rect: None,
            target: None,
        }
    }
}

impl MaskDescriptor {
    /// Auto-detecting descriptor for `mask`.
    pub fn new(mask: NodeRef) -> Self {
        Self { mask: Some(mask), ..Self::default() }
    }

    /// Descriptor with a fixed technique; classification is skipped.
    pub fn with_technique(mask: NodeRef, technique: MaskTechnique) -> Self {
        Self {
            technique,
            auto_detect: false,
            mask: Some(mask),
            ..Self::default()
        }
    }

    pub(crate) fn pooled() -> Self {
        Self { pooled: true, ..Self::default() }
    }

    /// Owned by the coordinator's pool rather than the caller.
    #[inline]
    pub fn is_pooled(&self) -> bool {
        self.pooled
    }

    /// Stencil masks active at and below this one.
    #[inline]
    pub fn stencil_depth(&self) -> u32 {
        self.stencil_depth
    }

    /// Area clips active at and below this one.
    #[inline]
    pub fn area_clip_depth(&self) -> u32 {
        self.area_clip_depth
    }

    /// Effective clip rectangle (logical px), intersected with all enclosing clips.
    #[inline]
    pub fn area_rect(&self) -> Option<Rect> {
        self.area_rect
    }

    #[inline]
    pub fn target(&self) -> Option<&NodeRef> {
        self.target.as_ref()
    }

    /// Inherits nesting state from `prev`, or starts fresh.
    pub(crate) fn copy_counters(&mut self, prev: Option<&MaskDescriptor>) {
        match prev {
            Some(p) => {
                self.stencil_depth = p.stencil_depth;
                self.area_clip_depth = p.area_clip_depth;
                self.area_rect = p.area_rect;
            }
            None => {
                self.stencil_depth = 0;
                self.area_clip_depth = 0;
                self.area_rect = None;
            }
        }
    }

    /// Clears per-push state after pop.
    ///
    /// Pooled descriptors also drop their mask and classification so the
    /// next user starts clean; caller-owned ones keep both for reuse.
    pub fn reset(&mut self) {
        if self.pooled {
            self.mask = None;
            self.technique = MaskTechnique::None;
            self.auto_detect = true;
        }
        self.stencil_depth = 0;
        self.area_clip_depth = 0;
        self.area_rect = None;
        self.target = None;
    }
}

/// What to mask with: a bare node (wrapped in a pooled descriptor) or a
/// caller-configured descriptor.
#[derive(Debug, Clone)]
pub enum MaskSpec {
    Node(NodeRef),
    Descriptor(MaskDescriptor),
}

impl From<NodeRef> for MaskSpec {
    fn from(node: NodeRef) -> Self {
        MaskSpec::Node(node)
    }
}

impl From<MaskDescriptor> for MaskSpec {
    fn from(descriptor: MaskDescriptor) -> Self {
        MaskSpec::Descriptor(descriptor)
    }
}
