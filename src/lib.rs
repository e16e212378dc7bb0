//! Shapeshop
//!
//! A small 3D scene editor built on wgpu and winit. Primitive shapes, OBJ
//! meshes and lights are created from the sidebar or the control panel, picked
//! with the mouse, transformed with the wheel and saved to JSON.

pub mod app;
pub mod config;
pub mod control_panel;
pub mod error;
pub mod gfx;
pub mod input;
pub mod performance;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

pub use app::EditorApp;
pub use error::{EditorError, Result};
