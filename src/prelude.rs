//! # Shapeshop Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use shapeshop::prelude::*;
//!
//! let scene = Scene::new(&EditorConfig::default());
//! assert!(scene.objects.is_empty());
//! ```

pub use crate::app::EditorApp;
pub use crate::config::{EditorConfig, InteractionSettings};
pub use crate::error::{EditorError, Result};

pub use crate::gfx::camera::{Camera, CameraPreset, Projection, Viewport};
pub use crate::gfx::context::{GraphicsContext, SelectionContext};
pub use crate::gfx::geometry::GeometryData;
pub use crate::gfx::picking::SoftwareSelector;
pub use crate::gfx::rendering::{FrameRecorder, RecordedFrame};
pub use crate::gfx::scene::{ObjectKind, ObjectRequest, Scene, SceneObject, Shape, Transform};

pub use crate::input::{InputEvent, InputFrame, Key, Modifiers, MouseButton, WheelDirection};
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};

pub use cgmath::{Matrix4, Vector3};
