/// Depth/stencil format allocated for stencil masks.
pub const STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Surface currently being rendered to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderTarget {
    /// The window framebuffer; device space has a bottom-left origin.
    Primary,
    /// A render texture with its own resolution; no vertical flip.
    Offscreen { resolution: f32 },
}

/// Framebuffer management seam.
pub trait FramebufferSystem {
    /// Ensures the current render target has a stencil attachment.
    fn force_stencil(&mut self);

    fn current_target(&self) -> RenderTarget;
}

/// Stencil attachment texture.
#[derive(Debug)]
pub struct StencilTexture {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl StencilTexture {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("veil stencil attachment"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { view, size }
    }

    /// View for the render pass depth/stencil attachment.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// [`FramebufferSystem`] over a wgpu device.
///
/// The stencil attachment is allocated lazily the first time a stencil mask
/// is pushed and re-allocated after a resize.
#[derive(Debug)]
pub struct WgpuFramebuffer<'d> {
    device: &'d wgpu::Device,
    size: (u32, u32),
    stencil: Option<StencilTexture>,
    allocations: usize,
    /// Resolutions of nested offscreen targets.
    offscreen: Vec<f32>,
}

impl<'d> WgpuFramebuffer<'d> {
    pub fn new(device: &'d wgpu::Device, size: (u32, u32)) -> Self {
        Self { device, size, stencil: None, allocations: 0, offscreen: Vec::new() }
    }

    /// Updates the primary target size (physical pixels).
    ///
    /// The stencil attachment is dropped and re-created on next use.
    pub fn resize(&mut self, size: (u32, u32)) {
        if size != self.size {
            self.size = size;
            self.stencil = None;
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn stencil(&self) -> Option<&StencilTexture> {
        self.stencil.as_ref()
    }

    /// Stencil attachments created so far.
    #[inline]
    pub fn stencil_allocations(&self) -> usize {
        self.allocations
    }

    /// Makes an offscreen target with `resolution` current.
    pub fn begin_offscreen(&mut self, resolution: f32) {
        self.offscreen.push(resolution);
    }

    /// Returns to the enclosing target.
    pub fn end_offscreen(&mut self) {
        if self.offscreen.pop().is_none() {
            log::warn!("end_offscreen without matching begin_offscreen");
        }
    }
}

impl FramebufferSystem for WgpuFramebuffer<'_> {
    fn force_stencil(&mut self) {
        if self.stencil.as_ref().is_some_and(|s| s.size() == self.size) {
            return;
        }
        log::debug!("allocating stencil attachment {}x{}", self.size.0, self.size.1);
        self.stencil = Some(StencilTexture::new(self.device, self.size.0, self.size.1));
        self.allocations += 1;
    }

    fn current_target(&self) -> RenderTarget {
        match self.offscreen.last() {
            Some(&resolution) => RenderTarget::Offscreen { resolution },
            None => RenderTarget::Primary,
        }
    }
}
