use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::config::{EditorConfig, InteractionSettings};
use crate::error::{EditorError, Result};
use crate::gfx::{
    camera::{Camera, CameraPreset, Projection, Viewport},
    context::{GraphicsContext, SelectionContext},
    geometry::{generate_axes, LineSegment},
    picking::PickingService,
    rendering::shadow::{planar_shadow_matrix, SHADOW_PLANE_Y},
};
use crate::input::{
    ControllerAction, DragOp, InputEvent, InputFrame, InteractionController, MouseButton,
    ScrollOp, WheelDirection,
};
use crate::ui::Sidebar;

use super::lights::{LightPool, LightSource};
use super::object::{ObjectKind, ObjectRecord, SceneObject};

const AXES_EXTENT: i32 = 10;

/// A request to create an object, queued until the next frame
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRequest {
    Primitive(ObjectKind),
    Mesh { path: PathBuf, swap_yz: bool },
}

/// Scene file layout as read. Entries stay untyped so one bad entry can be
/// skipped without rejecting the file.
#[derive(Debug, Deserialize)]
struct SceneDocument {
    objects: Vec<serde_json::Value>,
    #[serde(default)]
    camera: Option<Camera>,
}

/// Scene file layout as written
#[derive(Debug, Serialize)]
struct SavedScene<'a> {
    objects: Vec<ObjectRecord>,
    camera: &'a Camera,
}

/// Result of [`Scene::load`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Main scene containing objects, cameras and the interaction state
pub struct Scene {
    /// Draw order and picking order
    pub objects: Vec<SceneObject>,
    pub camera: Camera,
    pub overview_camera: Camera,
    pub show_overview: bool,
    pub sidebar: Sidebar,
    controller: InteractionController,
    light_pool: LightPool,
    projection: Projection,
    picking: PickingService,
    request_tx: Sender<ObjectRequest>,
    request_rx: Receiver<ObjectRequest>,
    viewport: Viewport,
    settings: InteractionSettings,
    scene_path: PathBuf,
    shadows: bool,
    axes: Vec<LineSegment>,
}

impl Scene {
    pub fn new(config: &EditorConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let projection = Projection::default();

        let mut overview_camera = Camera::default();
        overview_camera.set_preset(CameraPreset::Top);

        Self {
            objects: Vec::new(),
            camera: Camera::default(),
            overview_camera,
            show_overview: false,
            sidebar: Sidebar::new(),
            controller: InteractionController::new(),
            light_pool: LightPool::new(config.light_slots),
            projection,
            picking: PickingService::new(projection),
            request_tx,
            request_rx,
            viewport: Viewport::new(config.window.width as f32, config.window.height as f32),
            settings: config.interaction,
            scene_path: config.scene_path.clone(),
            shadows: config.shadows,
            axes: generate_axes(AXES_EXTENT),
        }
    }

    /// Sender half of the creation queue, for producers on other threads.
    pub fn request_sender(&self) -> Sender<ObjectRequest> {
        self.request_tx.clone()
    }

    pub fn queue_object(&self, request: ObjectRequest) {
        // The receiver lives in `self`, so the send cannot fail
        let _ = self.request_tx.send(request);
    }

    /// Instantiates a primitive at the origin and returns its index.
    pub fn add_object(&mut self, kind: ObjectKind) -> Result<usize> {
        let mut object = SceneObject::from_kind(kind)?;
        if kind == ObjectKind::Light {
            let slot = self.light_pool.acquire()?;
            object.set_light_slot(Some(slot));
        }
        Ok(self.push_object(object))
    }

    pub fn add_mesh(&mut self, path: impl AsRef<Path>, swap_yz: bool) -> Result<usize> {
        let object = SceneObject::mesh(path.as_ref(), swap_yz)?;
        Ok(self.push_object(object))
    }

    fn push_object(&mut self, object: SceneObject) -> usize {
        log::info!(
            "Added {}, {} objects in scene",
            object.kind(),
            self.objects.len() + 1
        );
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Creates every queued object. Failures are logged and skipped.
    pub fn drain_requests(&mut self) -> usize {
        let mut created = 0;
        while let Ok(request) = self.request_rx.try_recv() {
            let result = match &request {
                ObjectRequest::Primitive(kind) => self.add_object(*kind),
                ObjectRequest::Mesh { path, swap_yz } => self.add_mesh(path, *swap_yz),
            };
            match result {
                Ok(_) => created += 1,
                Err(e) => log::warn!("Could not create {request:?}: {e}"),
            }
        }
        created
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn overview_viewport(&self) -> Viewport {
        Viewport::overview_inset(self.viewport.width, self.viewport.height)
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::new(width as f32, height as f32);
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn light_pool(&self) -> &LightPool {
        &self.light_pool
    }

    pub fn scene_path(&self) -> &Path {
        &self.scene_path
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows
    }

    pub fn set_shadows(&mut self, enabled: bool) {
        self.shadows = enabled;
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        self.objects.iter().any(|object| object.selected)
    }

    /// Index of the closest object under window pixel `(x, y)`. Clicks on
    /// the overview inset pick through the overview camera.
    pub fn pick<S: SelectionContext + ?Sized>(&self, selector: &mut S, x: f32, y: f32) -> Option<usize> {
        let window_height = self.viewport.height;
        let overview = self.overview_viewport();
        let (camera, viewport) = if self.show_overview && overview.contains(x, y, window_height) {
            (&self.overview_camera, overview)
        } else {
            (&self.camera, self.viewport)
        };
        self.picking
            .pick(selector, &self.objects, camera, viewport, window_height, [x, y])
    }

    /// Toggles the object under the cursor. A newly selected object clears
    /// the rest of the selection unless `additive` is set. Empty space is a
    /// no-op.
    pub fn select_at<S: SelectionContext + ?Sized>(
        &mut self,
        selector: &mut S,
        x: f32,
        y: f32,
        additive: bool,
    ) -> Option<usize> {
        let index = self.pick(selector, x, y)?;

        let selected = !self.objects[index].selected;
        self.objects[index].selected = selected;
        if selected && !additive {
            for (i, object) in self.objects.iter_mut().enumerate() {
                if i != index {
                    object.selected = false;
                }
            }
        }
        log::debug!(
            "{} {} #{index}",
            if selected { "Selected" } else { "Deselected" },
            self.objects[index].kind()
        );
        Some(index)
    }

    /// Removes the first selected object, returning its light slot to the pool.
    pub fn delete_selected(&mut self) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.selected)?;
        let object = self.objects.remove(index);
        if let Some(slot) = object.light_slot() {
            self.light_pool.release(slot);
        }
        log::info!("Deleted {} #{index}, {} objects left", object.kind(), self.objects.len());
        Some(object)
    }

    /// Feeds one frame of input through the interaction controller.
    pub fn process_input<S: SelectionContext + ?Sized>(&mut self, frame: &InputFrame, selector: &mut S) {
        // Taken out so handlers can borrow the rest of the scene mutably
        let mut controller = std::mem::take(&mut self.controller);
        controller.begin_frame(frame.modifiers);

        for event in &frame.events {
            match *event {
                InputEvent::KeyDown(key) => {
                    if let Some(action) = controller.key(key, true) {
                        self.apply_action(action);
                    }
                }
                InputEvent::KeyUp(key) => {
                    controller.key(key, false);
                }
                InputEvent::MouseDown {
                    button: MouseButton::Left,
                    x,
                    y,
                } => {
                    if let Some(kind) = self.sidebar.check_click(x, y) {
                        self.queue_object(ObjectRequest::Primitive(kind));
                        continue;
                    }
                    self.select_at(selector, x, y, frame.modifiers.shift);
                    controller.press(MouseButton::Left, x, y);
                }
                InputEvent::MouseDown {
                    button: MouseButton::Right,
                    x,
                    y,
                } => controller.press(MouseButton::Right, x, y),
                InputEvent::MouseUp { .. } => controller.release(),
                InputEvent::MouseMotion { x, y } => {
                    self.sidebar.update_hover(x, y);
                    if let Some(op) = controller.drag(x, y) {
                        self.apply_drag(op);
                    }
                }
                InputEvent::Scroll(direction) => {
                    let ops = controller.scroll(direction, &self.settings);
                    self.apply_scroll(direction, &ops);
                }
            }
        }

        self.controller = controller;
    }

    fn apply_action(&mut self, action: ControllerAction) {
        match action {
            ControllerAction::CameraPreset(preset) => self.camera.set_preset(preset),
            ControllerAction::ToggleOverview => self.show_overview = !self.show_overview,
            ControllerAction::ToggleSidebar => self.sidebar.toggle_visibility(),
            ControllerAction::DeleteSelected => {
                self.delete_selected();
            }
            ControllerAction::SaveScene => {
                let path = self.scene_path.clone();
                if let Err(e) = self.save(&path) {
                    log::error!("Saving scene failed: {e}");
                }
            }
            ControllerAction::ReloadScene => {
                let path = self.scene_path.clone();
                if let Err(e) = self.load(&path) {
                    log::error!("Loading scene failed: {e}");
                }
            }
        }
    }

    fn apply_drag(&mut self, op: DragOp) {
        match op {
            DragOp::Orbit { dx, dy } => {
                let k = self.settings.orbit_speed;
                self.camera.orbit(dx * k, dy * k);
            }
            DragOp::Pan { dx, dy } => self.camera.pan(dx, dy, self.settings.pan_speed),
        }
    }

    /// Scroll transforms the selection, or zooms when nothing is selected.
    fn apply_scroll(&mut self, direction: WheelDirection, ops: &[ScrollOp]) {
        if !self.has_selection() {
            self.camera.zoom_by(direction.sign() * self.settings.zoom_step);
            return;
        }

        for object in self.objects.iter_mut().filter(|object| object.selected) {
            for op in ops {
                match *op {
                    ScrollOp::Rotate(axis, degrees) => object.rotate(degrees, axis),
                    ScrollOp::Translate(axis, distance) => object.translate(distance, axis),
                    ScrollOp::Scale(axis, delta) => object.scale(delta, axis),
                    ScrollOp::ScaleUniform(delta) => object.scale_uniform(delta),
                    ScrollOp::Shear(plane, factor) => object.shear(factor, plane),
                }
            }
        }
    }

    /// One editor frame: input, queued creations, then the main view.
    pub fn run_frame<S, G>(&mut self, frame: &InputFrame, selector: &mut S, ctx: &mut G)
    where
        S: SelectionContext + ?Sized,
        G: GraphicsContext + ?Sized,
    {
        self.process_input(frame, selector);
        self.drain_requests();
        self.render(ctx);
    }

    /// Records the main view.
    pub fn render<G: GraphicsContext + ?Sized>(&self, ctx: &mut G) {
        self.draw_world(ctx, &self.camera);
    }

    /// Records the overview inset.
    pub fn render_overview<G: GraphicsContext + ?Sized>(&self, ctx: &mut G) {
        self.draw_world(ctx, &self.overview_camera);
    }

    fn draw_world<G: GraphicsContext + ?Sized>(&self, ctx: &mut G, camera: &Camera) {
        ctx.push_matrix();
        ctx.mul_matrix(camera.view_matrix());

        ctx.draw_lines(&self.axes);
        for object in &self.objects {
            object.draw(ctx, false);
        }

        if self.shadows {
            if let Some(light) = self.light_sources().first() {
                ctx.push_matrix();
                ctx.mul_matrix(planar_shadow_matrix(light.position, SHADOW_PLANE_Y));
                for object in self.objects.iter().filter(|o| o.kind() != ObjectKind::Light) {
                    object.draw(ctx, true);
                }
                ctx.pop_matrix();
            }
        }

        ctx.pop_matrix();
    }

    /// Shading data for every light that holds a slot, in slot order.
    pub fn light_sources(&self) -> Vec<LightSource> {
        let mut lights: Vec<LightSource> = self
            .objects
            .iter()
            .filter_map(SceneObject::light_source)
            .collect();
        lights.sort_by_key(|light| light.slot);
        lights
    }

    /// Writes the objects and the camera as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let document = SavedScene {
            objects: self.objects.iter().map(SceneObject::to_record).collect(),
            camera: &self.camera,
        };

        let text = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, text).map_err(|e| EditorError::io(path, e))?;
        log::info!("Saved {} objects to {}", self.objects.len(), path.display());
        Ok(())
    }

    /// Replaces the objects with the contents of a scene file.
    ///
    /// Entries with an unknown type or bad fields are skipped. The scene is
    /// left untouched when the file is missing or is not a scene document.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EditorError::SceneNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        let document: SceneDocument = serde_json::from_str(&text)?;

        self.objects.clear();
        self.light_pool.reset();

        let mut summary = LoadSummary::default();
        for entry in document.objects {
            match self.restore_object(entry) {
                Ok(_) => summary.loaded += 1,
                Err(e) => {
                    log::warn!("Skipping scene entry: {e}");
                    summary.skipped += 1;
                }
            }
        }

        if let Some(camera) = document.camera {
            self.camera = camera;
        }

        log::info!(
            "Loaded {} objects from {} ({} skipped)",
            summary.loaded,
            path.display(),
            summary.skipped
        );
        Ok(summary)
    }

    fn restore_object(&mut self, entry: serde_json::Value) -> Result<usize> {
        let mut object = SceneObject::from_value(entry)?;
        if object.kind() == ObjectKind::Light {
            object.set_light_slot(Some(self.light_pool.acquire()?));
        }
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }
}
