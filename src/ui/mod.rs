//! # User Interface Module
//!
//! Dear ImGui integration plus the editor's 2D overlay.
//!
//! - [`UiManager`] - ImGui context, winit input forwarding, wgpu rendering
//! - [`Sidebar`] - object creation buttons, hit-tested before picking
//! - [`overlay`] - draws the sidebar, overview frame and status line
//!
//! The overlay only uses the background draw list, so ImGui never captures
//! clicks meant for the scene.

pub mod manager;
pub mod overlay;
pub mod sidebar;

pub use manager::UiManager;
pub use overlay::{draw_overlay, OverlayState};
pub use sidebar::{Button, Sidebar};
