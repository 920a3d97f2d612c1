use crate::coords::{Affine, Rect, Vec2};
use crate::render::Batcher;

use super::{DrawCmd, SceneNode, TextureId};

/// Textured quad whose alpha channel can act as a mask.
#[derive(Debug, Clone)]
pub struct SpriteNode {
    texture: TextureId,
    size: Vec2,
    /// Normalized anchor; `(0.5, 0.5)` centers the quad on the origin.
    anchor: Vec2,
    transform: Affine,
    renderable: bool,
    filter_area: Option<Rect>,
}

impl SpriteNode {
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            size,
            anchor: Vec2::zero(),
            transform: Affine::IDENTITY,
            renderable: true,
            filter_area: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.renderable = false;
        self
    }

    fn local_rect(&self) -> Rect {
        Rect::new(
            -self.anchor.x * self.size.x,
            -self.anchor.y * self.size.y,
            self.size.x,
            self.size.y,
        )
    }
}

impl SceneNode for SpriteNode {
    fn bounds(&self, _skip_update_transform: bool) -> Rect {
        self.transform.transform_rect_bounds(self.local_rect())
    }

    fn world_transform(&self) -> Affine {
        self.transform
    }

    fn render(&self, batch: &mut dyn Batcher) {
        if self.renderable {
            batch.draw(DrawCmd::Sprite {
                texture: self.texture,
                rect: self.local_rect(),
                transform: self.transform,
            });
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

    fn is_image_like(&self) -> bool {
        true
    }

    fn texture(&self) -> Option<TextureId> {
        Some(self.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_anchor_offsets_bounds() {
        let sprite = SpriteNode::new(TextureId(1), Vec2::new(20.0, 10.0))
            .with_anchor(Vec2::new(0.5, 0.5))
            .with_transform(Affine::translate(50.0, 50.0));
        assert_eq!(sprite.bounds(true), Rect::new(40.0, 45.0, 20.0, 10.0));
    }
}
