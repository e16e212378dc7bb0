//! # Graphics Boundary
//!
//! Scene objects never talk to the GPU directly. They draw into a
//! [`GraphicsContext`], a small immediate-mode interface with a matrix stack,
//! a current material and a current name. Two implementations exist:
//!
//! - [`FrameRecorder`](crate::gfx::rendering::FrameRecorder) bakes the calls
//!   into vertex lists for the wgpu renderer
//! - [`SoftwareSelector`](crate::gfx::picking::SoftwareSelector) runs the same
//!   calls in select mode and reports which names covered the pick window
//!
//! Because both consume the identical draw calls, what the user sees and what
//! picking hits can not drift apart.

use cgmath::Matrix4;

use crate::gfx::geometry::{GeometryData, LineSegment};

/// Colour and lighting state applied to subsequent geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialState {
    pub color: [f32; 3],
    /// Unlit geometry ignores scene lights (shadows, light markers, lines)
    pub lit: bool,
}

impl MaterialState {
    pub const fn lit(color: [f32; 3]) -> Self {
        Self { color, lit: true }
    }

    pub const fn unlit(color: [f32; 3]) -> Self {
        Self { color, lit: false }
    }
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::lit([0.5, 0.5, 0.5])
    }
}

/// Immediate-mode drawing interface shared by rendering and picking.
pub trait GraphicsContext {
    /// Saves the current model-view matrix.
    fn push_matrix(&mut self);
    /// Restores the last saved model-view matrix. Popping an empty stack is ignored.
    fn pop_matrix(&mut self);
    /// Post-multiplies the current model-view matrix.
    fn mul_matrix(&mut self, matrix: Matrix4<f32>);
    /// Name reported for subsequent geometry in select mode (0 = none).
    fn load_name(&mut self, name: u32);
    fn set_material(&mut self, material: MaterialState);
    fn draw_geometry(&mut self, geometry: &GeometryData);
    fn draw_lines(&mut self, lines: &[LineSegment]);
}

/// Window-space rectangle the pick matrix narrows the projection to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRegion {
    /// Centre in window coordinates, origin bottom-left
    pub center: [f32; 2],
    pub size: [f32; 2],
    /// `[x, y, width, height]` of the viewport being picked in
    pub viewport: [f32; 4],
}

/// One select-mode hit: the depth range covered by a name
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub min_depth: f32,
    pub max_depth: f32,
    pub names: Vec<u32>,
}

impl HitRecord {
    /// Words the record takes in a select buffer: count, min, max, names
    pub fn word_len(&self) -> usize {
        3 + self.names.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOutcome {
    pub hits: Vec<HitRecord>,
    /// A record did not fit the buffer and was dropped
    pub overflowed: bool,
}

/// Select-mode extension of [`GraphicsContext`].
pub trait SelectionContext: GraphicsContext {
    /// Enters select mode with room for `capacity` buffer words. The projection
    /// and model-view must be set up after this call.
    fn begin_select(&mut self, region: PickRegion, capacity: usize);
    /// Replaces the projection matrix (the pick matrix is applied on top).
    fn set_projection(&mut self, projection: Matrix4<f32>);
    /// Leaves select mode and returns the collected hit records.
    fn end_select(&mut self) -> SelectOutcome;
}
