use wgpu::{CompareFunction, StencilOperation};

/// Fixed-function tests the mask layer toggles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Capability {
    StencilTest,
    ScissorTest,
}

/// Scissor region in device pixels, bottom-left origin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRegion {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rounds fractional device coordinates to whole pixels.
    /// Negative extents collapse to zero.
    #[inline]
    pub fn from_device(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
            width: width.round().max(0.0) as u32,
            height: height.round().max(0.0) as u32,
        }
    }
}

/// Immediate-mode GPU state seam.
///
/// Stencil values are compared as `(stencil & read_mask) <op> (reference & read_mask)`.
pub trait GpuContext {
    fn enable(&mut self, cap: Capability);

    fn disable(&mut self, cap: Capability);

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool);

    fn stencil_func(&mut self, compare: CompareFunction, reference: u32, read_mask: u32);

    fn stencil_op(&mut self, fail: StencilOperation, depth_fail: StencilOperation, pass: StencilOperation);

    /// Sets the stencil clear value and clears the stencil buffer to it.
    fn clear_stencil(&mut self, value: u32);

    fn scissor(&mut self, region: ScissorRegion);
}
