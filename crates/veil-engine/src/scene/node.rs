use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::coords::{Affine, Rect};
use crate::render::Batcher;

use super::TextureId;

/// Capabilities the mask layer needs from a scene-graph node.
///
/// Nodes are shared through [`NodeRef`]; identity is pointer identity.
pub trait SceneNode: fmt::Debug {
    /// World-space bounds.
    ///
    /// `skip_update_transform` asks the node not to refresh its world
    /// transform first; nodes that store a resolved world transform ignore it.
    fn bounds(&self, skip_update_transform: bool) -> Rect;

    fn world_transform(&self) -> Affine;

    /// Submits draw commands. Must draw nothing while not renderable.
    fn render(&self, batch: &mut dyn Batcher);

    fn renderable(&self) -> bool;

    fn set_renderable(&mut self, renderable: bool);

    /// Region override used by offscreen filter passes.
    fn filter_area(&self) -> Option<Rect>;

    fn set_filter_area(&mut self, area: Option<Rect>);

    /// Alpha-bearing image nodes mask through the filter path.
    fn is_image_like(&self) -> bool {
        false
    }

    /// True only if the node's geometry is exactly one axis-aligned rectangle
    /// in local space.
    fn is_axis_aligned_rect(&self) -> bool {
        false
    }

    fn texture(&self) -> Option<TextureId> {
        None
    }
}

/// Shared, interior-mutable node handle.
pub type NodeRef = Rc<RefCell<dyn SceneNode>>;

/// Wraps a concrete node into a [`NodeRef`].
pub fn node_ref<N: SceneNode + 'static>(node: N) -> NodeRef {
    Rc::new(RefCell::new(node))
}

/// Node identity.
#[inline]
pub fn same_node(a: &NodeRef, b: &NodeRef) -> bool {
    Rc::ptr_eq(a, b)
}

/// Runs `f` with `node` forced renderable, then restores the previous flag.
///
/// Mask objects are normally kept out of regular rendering; the mask
/// backends need them drawable (and their bounds valid) for one call.
pub(crate) fn with_renderable<R>(node: &NodeRef, f: impl FnOnce(&dyn SceneNode) -> R) -> R {
    let prev = node.borrow().renderable();
    node.borrow_mut().set_renderable(true);
    let out = f(&*node.borrow());
    node.borrow_mut().set_renderable(prev);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{DrawList, ShapeNode};

    #[test]
    fn with_renderable_restores_flag() {
        let node = node_ref(ShapeNode::rect(Rect::new(0.0, 0.0, 4.0, 4.0)).hidden());
        let mut list = DrawList::new();

        with_renderable(&node, |n| {
            assert!(n.renderable());
            n.render(&mut list);
        });

        assert!(!node.borrow().renderable());
        assert_eq!(list.pending().len(), 1);
    }

    #[test]
    fn identity_is_by_pointer() {
        let a = node_ref(ShapeNode::new());
        let b = node_ref(ShapeNode::new());
        assert!(same_node(&a, &a.clone()));
        assert!(!same_node(&a, &b));
    }
}
