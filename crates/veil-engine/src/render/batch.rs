use crate::scene::DrawCmd;

/// Draw submission seam.
///
/// Mask backends draw mask geometry directly and call [`flush`](Self::flush)
/// right after, so stencil state changes never apply to earlier batched draws.
pub trait Batcher {
    fn draw(&mut self, cmd: DrawCmd);

    fn flush(&mut self);
}
