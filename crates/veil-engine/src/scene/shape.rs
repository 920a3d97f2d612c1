use crate::coords::{Affine, Rect};
use crate::render::Batcher;

use super::{DrawCmd, SceneNode, Shape};

/// Vector geometry node: a list of filled shapes under one world transform.
#[derive(Debug, Clone)]
pub struct ShapeNode {
    shapes: Vec<Shape>,
    transform: Affine,
    renderable: bool,
    filter_area: Option<Rect>,
}

impl Default for ShapeNode {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            transform: Affine::IDENTITY,
            renderable: true,
            filter_area: None,
        }
    }
}

impl ShapeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single rectangle, the shape eligible for scissor clipping.
    pub fn rect(rect: Rect) -> Self {
        Self::new().with_shape(Shape::Rect(rect))
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Starts non-renderable, the usual state of a node used only as a mask.
    pub fn hidden(mut self) -> Self {
        self.renderable = false;
        self
    }
}

impl SceneNode for ShapeNode {
    fn bounds(&self, _skip_update_transform: bool) -> Rect {
        self.shapes
            .iter()
            .map(|s| self.transform.transform_rect_bounds(s.local_bounds()))
            .reduce(Rect::union)
            .unwrap_or_default()
    }

    fn world_transform(&self) -> Affine {
        self.transform
    }

    fn render(&self, batch: &mut dyn Batcher) {
        if !self.renderable {
            return;
        }
        for shape in &self.shapes {
            batch.draw(DrawCmd::Fill { shape: shape.clone(), transform: self.transform });
        }
    }

    fn renderable(&self) -> bool {
        self.renderable
    }

    fn set_renderable(&mut self, renderable: bool) {
        self.renderable = renderable;
    }

    fn filter_area(&self) -> Option<Rect> {
        self.filter_area
    }

    fn set_filter_area(&mut self, area: Option<Rect>) {
        self.filter_area = area;
    }

    fn is_axis_aligned_rect(&self) -> bool {
        matches!(self.shapes.as_slice(), [Shape::Rect(_)])
    }
}
