use crate::coords::{Affine, Rect, Vec2};

/// Opaque handle to a GPU texture owned by the host renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Fill geometry in node-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    RoundedRect { rect: Rect, radius: f32 },
    Circle { center: Vec2, radius: f32 },
    Polygon(Vec<Vec2>),
}

impl Shape {
    /// Local-space bounds. An empty polygon has zero-area bounds at the origin.
    pub fn local_bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) | Shape::RoundedRect { rect: r, .. } => r.normalized(),
            Shape::Circle { center, radius } => {
                let r = radius.abs();
                Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
            }
            Shape::Polygon(points) => {
                let Some((&first, rest)) = points.split_first() else {
                    return Rect::default();
                };
                let (lo, hi) = rest
                    .iter()
                    .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
                Rect::from_points(lo, hi)
            }
        }
    }
}

/// Renderer-agnostic draw command submitted to a [`Batcher`](crate::render::Batcher).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill { shape: Shape, transform: Affine },
    Sprite { texture: TextureId, rect: Rect, transform: Affine },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_bounds_span_diameter() {
        let b = Shape::Circle { center: Vec2::new(10.0, 10.0), radius: 5.0 }.local_bounds();
        assert_eq!(b, Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn polygon_bounds_cover_all_points() {
        let tri = Shape::Polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 2.0),
            Vec2::new(4.0, -6.0),
        ]);
        assert_eq!(tri.local_bounds(), Rect::new(0.0, -6.0, 10.0, 8.0));
    }

    #[test]
    fn empty_polygon_has_empty_bounds() {
        assert!(Shape::Polygon(Vec::new()).local_bounds().is_empty());
    }
}
