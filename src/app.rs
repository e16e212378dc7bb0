use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::EditorConfig,
    control_panel,
    error::EditorError,
    gfx::{
        picking::SoftwareSelector,
        rendering::{FrameRecorder, RenderEngine, ViewportFrame},
        scene::Scene,
    },
    input::{InputEvent, InputFrame, Key, Modifiers, MouseButton, WheelDirection},
    performance::PerformanceMonitor,
    ui::{draw_overlay, overlay::status_line, OverlayState, UiManager},
};

/// The editor application: window, renderer, UI and the scene they show
pub struct EditorApp {
    config: EditorConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    selector: SoftwareSelector,
    main_recorder: FrameRecorder,
    overview_recorder: FrameRecorder,
    /// Input collected since the last frame
    input: InputFrame,
    cursor: [f32; 2],
    performance: PerformanceMonitor,
    frame_interval: Duration,
    next_frame: Instant,
}

impl EditorApp {
    pub fn new(config: EditorConfig) -> Self {
        let mut scene = Scene::new(&config);
        if config.load_on_start {
            match scene.load(&config.scene_path) {
                Ok(_) => {}
                Err(EditorError::SceneNotFound(path)) => {
                    log::info!("No scene at {}, starting empty", path.display())
                }
                Err(e) => log::warn!("Could not load {}: {e}", config.scene_path.display()),
            }
        }

        let frame_interval = Duration::from_secs_f64(1.0 / config.window.target_fps.max(1) as f64);
        Self {
            config,
            window: None,
            render_engine: None,
            ui_manager: None,
            scene,
            selector: SoftwareSelector::new(),
            main_recorder: FrameRecorder::new(),
            overview_recorder: FrameRecorder::new(),
            input: InputFrame::default(),
            cursor: [0.0, 0.0],
            performance: PerformanceMonitor::new(),
            frame_interval,
            next_frame: Instant::now(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> anyhow::Result<()> {
        if self.config.control_panel {
            control_panel::spawn(self.scene.request_sender())
                .context("Failed to start the control panel")?;
        }

        let event_loop = EventLoop::new().context("Failed to create event loop")?;
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now()));
        event_loop
            .run_app(&mut self)
            .context("Event loop terminated with an error")?;
        Ok(())
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );

        let (width, height) = window.inner_size().into();
        let background = self.config.window.background;
        let window_clone = window.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, background).await
        })?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.scene.resize(width, height);
        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
        log::info!("Window ready at {width}x{height}");
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(width, height);
        }
        self.scene.resize(width, height);
    }

    /// Translates a window event into editor input. Returns `false` for
    /// events that are not input.
    fn collect_input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.input.modifiers = Modifiers {
                    ctrl: state.control_key(),
                    shift: state.shift_key(),
                    alt: state.alt_key(),
                };
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let Some(key) = Key::from_key_code(*code) else {
                    return true;
                };
                match state {
                    ElementState::Pressed if !repeat => self.input.push(InputEvent::KeyDown(key)),
                    ElementState::Released => self.input.push(InputEvent::KeyUp(key)),
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x as f32, position.y as f32];
                self.input.push(InputEvent::MouseMotion {
                    x: self.cursor[0],
                    y: self.cursor[1],
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    _ => return true,
                };
                let [x, y] = self.cursor;
                self.input.push(match state {
                    ElementState::Pressed => InputEvent::MouseDown { button, x, y },
                    ElementState::Released => InputEvent::MouseUp { button, x, y },
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                if let Some(direction) = WheelDirection::from_delta(amount) {
                    self.input.push(InputEvent::Scroll(direction));
                }
            }
            _ => return false,
        }
        true
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        let frame = self.input.take();
        self.scene
            .run_frame(&frame, &mut self.selector, &mut self.main_recorder);
        let main_frame = self.main_recorder.finish();
        let overview_frame = self.scene.show_overview.then(|| {
            self.scene.render_overview(&mut self.overview_recorder);
            self.overview_recorder.finish()
        });

        let scene = &self.scene;
        let lights = scene.light_sources();
        let viewport = scene.viewport();
        let main = ViewportFrame {
            viewport,
            view: scene.camera.view_matrix(),
            projection: scene.projection().matrix(viewport.aspect()),
            frame: &main_frame,
            lights: &lights,
        };
        let overview_viewport = scene.overview_viewport();
        let overview = overview_frame.as_ref().map(|frame| ViewportFrame {
            viewport: overview_viewport,
            view: scene.overview_camera.view_matrix(),
            projection: scene.projection().matrix(overview_viewport.aspect()),
            frame,
            lights: &lights,
        });

        let frames = std::iter::once(&main_frame).chain(overview_frame.as_ref());
        let (triangles, lines) = frames.fold((0, 0), |(t, l), f| {
            (t + f.indices.len() / 3, l + f.lines.len() / 2)
        });
        self.performance.update_render_stats(triangles as u32, lines as u32);

        let overlay = OverlayState {
            sidebar: &scene.sidebar,
            overview: scene.show_overview.then_some(overview_viewport),
            window_height: viewport.height,
            status: status_line(
                scene.objects.len(),
                scene.selected_indices().len(),
                scene.controller().modes(),
            ),
        };

        let performance = &self.performance;
        let ui_callback = self.ui_manager.as_mut().map(|ui_manager| {
            move |device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                ui_manager.draw(device, queue, encoder, window, view, |ui| {
                    draw_overlay(ui, &overlay);
                    performance.render_overlay(ui);
                });
            }
        });

        match render_engine.render_frame(main, overview, ui_callback) {
            Ok(()) => self.performance.tick(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_engine.get_surface_size();
                render_engine.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipped frame: {e}"),
        }
    }
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("{e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.capture_event(&window, window_id, &event) {
                return;
            }
        }

        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        {
            event_loop.exit();
            return;
        }

        if self.collect_input(&event) {
            return;
        }

        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => self.resize(width, height),
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
            self.next_frame = now + self.frame_interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
