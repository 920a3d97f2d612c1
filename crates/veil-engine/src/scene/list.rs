use crate::render::Batcher;

use super::DrawCmd;

/// Recording batcher.
///
/// Commands accumulate in `pending` until [`Batcher::flush`] moves them to
/// `flushed`, preserving submission order. Hosts that drive a real GPU
/// batcher use it as a reference; tools and tests inspect it directly.
///
/// Performance characteristics:
/// - `draw()` is O(1)
/// - `clear()` keeps allocated capacity for reuse
#[derive(Debug, Default)]
pub struct DrawList {
    pending: Vec<DrawCmd>,
    flushed: Vec<DrawCmd>,
    flush_calls: usize,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded commands. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.pending.clear();
        self.flushed.clear();
        self.flush_calls = 0;
    }

    /// Commands submitted since the last flush.
    #[inline]
    pub fn pending(&self) -> &[DrawCmd] {
        &self.pending
    }

    /// Commands already flushed, in submission order.
    #[inline]
    pub fn flushed(&self) -> &[DrawCmd] {
        &self.flushed
    }

    /// Number of `flush()` calls, including ones with nothing pending.
    #[inline]
    pub fn flush_calls(&self) -> usize {
        self.flush_calls
    }
}

impl Batcher for DrawList {
    fn draw(&mut self, cmd: DrawCmd) {
        self.pending.push(cmd);
    }

    fn flush(&mut self) {
        self.flush_calls += 1;
        self.flushed.append(&mut self.pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Affine, Rect};
    use crate::scene::Shape;

    fn fill(x: f32) -> DrawCmd {
        DrawCmd::Fill { shape: Shape::Rect(Rect::new(x, 0.0, 1.0, 1.0)), transform: Affine::IDENTITY }
    }

    #[test]
    fn flush_moves_pending_in_order() {
        let mut list = DrawList::new();
        list.draw(fill(0.0));
        list.flush();
        list.draw(fill(1.0));
        list.draw(fill(2.0));
        list.flush();

        assert!(list.pending().is_empty());
        assert_eq!(list.flushed(), &[fill(0.0), fill(1.0), fill(2.0)]);
        assert_eq!(list.flush_calls(), 2);
    }

    #[test]
    fn clear_resets_counters() {
        let mut list = DrawList::new();
        list.draw(fill(0.0));
        list.flush();
        list.clear();
        assert!(list.flushed().is_empty());
        assert_eq!(list.flush_calls(), 0);
    }
}
