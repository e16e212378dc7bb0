//! WGPU-based rendering engine for the editor
//!
//! Owns the surface, device and pipelines, and turns [`RecordedFrame`]s into
//! draw calls. The main view fills the window; the overview is drawn into an
//! inset viewport on top of it with a fresh depth buffer.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use cgmath::Matrix4;
use wgpu::TextureFormat;

use crate::gfx::{
    camera::{CameraUniform, Viewport},
    resources::{
        global_bindings::{global_bind_group_layout, GlobalBindings, GlobalUniform},
        TextureResource,
    },
    scene::{LightSource, Vertex3D},
};
use crate::wgpu_utils::DynamicBuffer;

use super::frame::RecordedFrame;
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const TRIANGLE_PIPELINE: &str = "Lit Triangles";
const LINE_PIPELINE: &str = "Lines";

/// One viewport's worth of recorded geometry plus the matrices it was
/// recorded with
pub struct ViewportFrame<'a> {
    pub viewport: Viewport,
    pub view: Matrix4<f32>,
    /// OpenGL-convention projection, converted before upload
    pub projection: Matrix4<f32>,
    pub frame: &'a RecordedFrame,
    pub lights: &'a [LightSource],
}

/// GPU buffers backing one viewport
struct ViewportTarget {
    bindings: GlobalBindings,
    vertices: DynamicBuffer<Vertex3D>,
    indices: DynamicBuffer<u32>,
    lines: DynamicBuffer<Vertex3D>,
}

impl ViewportTarget {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &'static str) -> Self {
        Self {
            bindings: GlobalBindings::new(device, layout, label),
            vertices: DynamicBuffer::new(device, wgpu::BufferUsages::VERTEX, 4096, label),
            indices: DynamicBuffer::new(device, wgpu::BufferUsages::INDEX, 8192, label),
            lines: DynamicBuffer::new(device, wgpu::BufferUsages::VERTEX, 512, label),
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &ViewportFrame) {
        let camera = CameraUniform::from_gl_projection(frame.projection);
        let uniform = GlobalUniform::new(camera, frame.view, frame.lights);
        self.bindings.ubo.write(queue, &uniform);
        self.vertices.write(device, queue, &frame.frame.triangles);
        self.indices.write(device, queue, &frame.frame.indices);
        self.lines.write(device, queue, &frame.frame.lines);
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipelines: &PipelineManager) {
        pass.set_bind_group(0, &self.bindings.bind_group, &[]);

        if !self.indices.is_empty() {
            if let Some(pipeline) = pipelines.get_pipeline(TRIANGLE_PIPELINE) {
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, self.vertices.slice());
                pass.set_index_buffer(self.indices.slice(), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.indices.len() as u32, 0, 0..1);
            }
        }

        if !self.lines.is_empty() {
            if let Some(pipeline) = pipelines.get_pipeline(LINE_PIPELINE) {
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, self.lines.slice());
                pass.draw(0..self.lines.len() as u32, 0..1);
            }
        }
    }
}

/// Converts a bottom-left-origin viewport into a wgpu viewport rect
/// (top-left origin). Returns `None` when it does not fit the surface.
pub fn surface_rect(viewport: &Viewport, surface_width: u32, surface_height: u32) -> Option<[f32; 4]> {
    let (sw, sh) = (surface_width as f32, surface_height as f32);
    let top = sh - viewport.y - viewport.height;
    let fits = viewport.x >= 0.0
        && top >= 0.0
        && viewport.width >= 1.0
        && viewport.height >= 1.0
        && viewport.x + viewport.width <= sw
        && top + viewport.height <= sh;
    fits.then_some([viewport.x, top, viewport.width, viewport.height])
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pipeline_manager: PipelineManager,
    main_target: ViewportTarget,
    overview_target: ViewportTarget,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `background` - Clear colour of the main view
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        background: [f32; 3],
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::depth(&device, config.width, config.height);

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let layout = global_bind_group_layout(&device);
        let main_target = ViewportTarget::new(&device, &layout, "Main View");
        let overview_target = ViewportTarget::new(&device, &layout, "Overview");

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("shader", include_str!("shader.wgsl"));

        let base = PipelineConfig::default()
            .with_shader("shader")
            .with_bind_group_layouts(vec![layout])
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_color_format(format);
        pipeline_manager
            .register_pipeline(
                TRIANGLE_PIPELINE,
                base.clone().with_label(TRIANGLE_PIPELINE),
            )
            .map_err(|e| anyhow!(e))?;
        pipeline_manager
            .register_pipeline(
                LINE_PIPELINE,
                base.with_label(LINE_PIPELINE)
                    .with_primitive_topology(wgpu::PrimitiveTopology::LineList),
            )
            .map_err(|e| anyhow!(e))?;

        let [r, g, b] = background;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            pipeline_manager,
            main_target,
            overview_target,
        })
    }

    /// Renders the main view, the optional overview inset and the UI overlay
    ///
    /// Surface loss is reported back so the caller can reconfigure by
    /// resizing; other errors skip the frame.
    pub fn render_frame<F>(
        &mut self,
        main: ViewportFrame,
        overview: Option<ViewportFrame>,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.main_target.upload(&self.device, &self.queue, &main);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth_attachment()),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some([x, y, w, h]) = surface_rect(&main.viewport, self.config.width, self.config.height) {
                render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
            }
            self.main_target.draw(&mut render_pass, &self.pipeline_manager);
        }

        if let Some(overview) = overview {
            match surface_rect(&overview.viewport, self.config.width, self.config.height) {
                Some([x, y, w, h]) => {
                    self.overview_target.upload(&self.device, &self.queue, &overview);
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Overview Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &surface_texture_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: Some(self.depth_attachment()),
                        occlusion_query_set: None,
                        timestamp_writes: None,
                    });
                    render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                    render_pass.set_scissor_rect(x as u32, y as u32, w as u32, h as u32);
                    self.overview_target.draw(&mut render_pass, &self.pipeline_manager);
                }
                None => log::trace!("Overview does not fit a {}x{} surface", self.config.width, self.config.height),
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_texture.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }

    /// Handles window resize by reconfiguring the surface and depth buffer.
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::depth(&self.device, width, height);
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
