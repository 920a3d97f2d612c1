use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Smallest rectangle containing both corner points.
    #[inline]
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        let lo = a.min(b);
        Rect::from_origin_size(lo, a.max(b) - lo)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    /// Corners in clockwise order starting at the origin.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let min = self.min();
        let max = self.max();
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        Rect::from_points(self.min(), self.max())
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let fitted = self.fit(other);
        if fitted.is_empty() { None } else { Some(fitted) }
    }

    /// Clamps `self` into `other`.
    ///
    /// Unlike [`intersect`](Self::intersect) this never fails: disjoint
    /// rectangles produce a zero-area rect on the clamped edge. Clip regions
    /// rely on this so that a fully clipped subtree still has a region to apply.
    /// Non-finite edges do not panic; a NaN edge of `other` leaves that side
    /// of `self` unclamped.
    #[inline]
    pub fn fit(self, other: Rect) -> Rect {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());

        let x0 = a0.x.min(a1.x).max(b0.x).min(b1.x);
        let y0 = a0.y.min(a1.y).max(b0.y).min(b1.y);
        let x1 = a0.x.max(a1.x).max(b0.x).min(b1.x);
        let y1 = a0.y.max(a1.y).max(b0.y).min(b1.y);

        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    /// Smallest rectangle containing both.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        Rect::from_points(a.min().min(b.min()), a.max().max(b.max()))
    }
}
