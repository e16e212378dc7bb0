pub mod camera;
pub mod camera_utils;

pub use camera::{Camera, CameraPreset, Projection, Viewport, DEFAULT_ZOOM};
pub use camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};
