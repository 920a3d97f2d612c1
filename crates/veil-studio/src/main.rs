use anyhow::{Context, Result};
use veil_engine::coords::{Affine, Rect, Vec2};
use veil_engine::logging::{init_logging, LoggingConfig};
use veil_engine::mask::{MaskCoordinator, MaskDescriptor, MaskTechnique};
use veil_engine::render::{
    FilterStack, FramebufferSystem, RenderCtx, RenderState, RenderTarget, WgpuFramebuffer,
    WgpuMaskState,
};
use veil_engine::scene::{node_ref, DrawList, Shape, ShapeNode, SpriteNode, TextureId};

/// Primary target size in physical pixels.
const SIZE: (u32, u32) = (800, 600);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    pollster::block_on(run())
}

async fn run() -> Result<()> {
    let (device, queue) = request_device().await?;
    let color = create_color_target(&device);
    let mut frame = Frame::new(&device);
    let mut masks = MaskCoordinator::default();

    // ── scene ─────────────────────────────────────────────────────────────
    let panel = node_ref(ShapeNode::rect(Rect::new(0.0, 0.0, 800.0, 600.0)));
    let card = node_ref(ShapeNode::rect(Rect::new(120.0, 100.0, 360.0, 260.0)));
    let badge = node_ref(ShapeNode::rect(Rect::new(200.0, 160.0, 64.0, 64.0)));

    let viewport = node_ref(ShapeNode::rect(Rect::new(100.0, 80.0, 400.0, 300.0)).hidden());
    let diamond = node_ref(
        ShapeNode::rect(Rect::new(-80.0, -80.0, 160.0, 160.0))
            .with_transform(Affine::translate(300.0, 230.0).then(Affine::rotate_degrees(45.0)))
            .hidden(),
    );
    let avatar = node_ref(
        SpriteNode::new(TextureId(1), Vec2::new(64.0, 64.0))
            .with_transform(Affine::translate(200.0, 160.0))
            .hidden(),
    );

    // ── nested push ───────────────────────────────────────────────────────
    masks.push(&mut frame.ctx(), &panel, viewport);
    frame.report("area clip", &masks);

    masks.push(&mut frame.ctx(), &card, diamond);
    frame.report("stencil in area clip", &masks);
    frame.submit(&device, &queue, &color);

    masks.push(&mut frame.ctx(), &badge, avatar);
    frame.report("alpha filter", &masks);

    // ── unwind ────────────────────────────────────────────────────────────
    masks.pop(&mut frame.ctx(), &badge);
    masks.pop(&mut frame.ctx(), &card);
    frame.report("stencil popped", &masks);

    if let Err(err) = masks.try_pop(&mut frame.ctx(), &card) {
        log::info!("out-of-order pop rejected: {err}");
    }

    masks.pop(&mut frame.ctx(), &panel);
    frame.report("all popped", &masks);
    frame.submit(&device, &queue, &color);

    // ── offscreen target ──────────────────────────────────────────────────
    let thumbnail = node_ref(ShapeNode::rect(Rect::new(0.0, 0.0, 256.0, 256.0)));
    let crop = node_ref(ShapeNode::rect(Rect::new(16.0, 16.0, 128.0, 64.0)).hidden());

    frame.framebuffer.begin_offscreen(0.5);
    masks.push(&mut frame.ctx(), &thumbnail, crop);
    frame.report("offscreen area clip", &masks);
    masks.pop(&mut frame.ctx(), &thumbnail);
    frame.framebuffer.end_offscreen();

    // Caller-owned descriptors come back on pop for reuse.
    let ring = node_ref(
        ShapeNode::new()
            .with_shape(Shape::Circle { center: Vec2::new(400.0, 300.0), radius: 120.0 })
            .hidden(),
    );
    let mut descriptor = MaskDescriptor::with_technique(ring, MaskTechnique::Stencil);
    for pass in 0..2 {
        masks.push(&mut frame.ctx(), &panel, descriptor);
        frame.report(&format!("reused descriptor #{pass}"), &masks);
        descriptor = masks
            .pop(&mut frame.ctx(), &panel)
            .context("caller descriptor was not returned")?;
    }

    // ── resize ────────────────────────────────────────────────────────────
    frame.resize((1024, 768));
    masks.push(&mut frame.ctx(), &panel, descriptor);
    frame.report("stencil after resize", &masks);
    masks.pop(&mut frame.ctx(), &panel);

    log::info!(
        "pooled descriptors: {}, stencil attachments allocated: {}",
        masks.pool_len(),
        frame.framebuffer.stencil_allocations(),
    );
    Ok(())
}

/// Headless device; no surface is needed to drive mask state.
async fn request_device() -> Result<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("failed to find a suitable GPU adapter")?;

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("veil-studio device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}

fn create_color_target(device: &wgpu::Device) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("veil-studio color target"),
            size: wgpu::Extent3d {
                width: SIZE.0,
                height: SIZE.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

/// Collaborators for one frame of masking.
struct Frame<'d> {
    gpu: WgpuMaskState,
    batch: DrawList,
    framebuffer: WgpuFramebuffer<'d>,
    filter: FilterStack,
    state: RenderState,
}

impl<'d> Frame<'d> {
    fn new(device: &'d wgpu::Device) -> Self {
        Self {
            gpu: WgpuMaskState::new(),
            batch: DrawList::new(),
            framebuffer: WgpuFramebuffer::new(device, SIZE),
            filter: FilterStack::new(),
            state: RenderState::new(SIZE.1 as f32, 1.0),
        }
    }

    fn ctx(&mut self) -> RenderCtx<'_> {
        RenderCtx::new(
            &mut self.gpu,
            &mut self.batch,
            &mut self.framebuffer,
            &mut self.filter,
            self.state,
        )
    }

    /// Resizes the primary target; the stencil attachment follows on next use.
    fn resize(&mut self, size: (u32, u32)) {
        self.framebuffer.resize(size);
        self.state.framebuffer_height = size.1 as f32;
    }

    fn report(&self, label: &str, masks: &MaskCoordinator) {
        let flip_y = self.framebuffer.current_target() == RenderTarget::Primary;
        let (x, y, w, h) = self.gpu.scissor_rect(self.framebuffer.size(), flip_y);
        let stencil = self.gpu.stencil_state();
        log::info!(
            "{label}: masks={} scissor=({x}, {y}, {w}x{h}) stencil_ref={} read_mask={:#b} compare={:?} filter_passes={} mask_draws={}",
            masks.stack().len(),
            self.gpu.stencil_reference(),
            stencil.read_mask,
            stencil.front.compare,
            self.filter.depth(),
            self.batch.flushed().len(),
        );
    }

    /// Encodes an empty pass that carries the current dynamic mask state.
    fn submit(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, color: &wgpu::TextureView) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("veil-studio encoder"),
        });
        let stencil_ops = self.gpu.take_stencil_ops();
        log::debug!("stencil load op {:?}", stencil_ops.load);

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("veil-studio mask pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: self.framebuffer.stencil().map(|s| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: s.view(),
                        depth_ops: None,
                        stencil_ops: Some(stencil_ops),
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            self.gpu.apply(&mut rpass, self.framebuffer.size(), true);
        }

        queue.submit(Some(encoder.finish()));
    }
}
