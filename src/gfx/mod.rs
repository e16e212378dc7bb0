//! # Graphics Module
//!
//! Everything between scene objects and the GPU.
//!
//! - **Draw boundary** ([`context`]) - immediate-mode [`GraphicsContext`] with a
//!   matrix stack, implemented for rendering and for picking
//! - **Camera** ([`camera`]) - spherical camera, presets, projection and viewports
//! - **Geometry** ([`geometry`]) - procedural primitives and OBJ loading
//! - **Picking** ([`picking`]) - select-mode hit testing on the CPU
//! - **Rendering** ([`rendering`]) - frame recording, pipelines, shadows
//! - **Scene** ([`scene`]) - objects, transforms, lights and persistence
//!
//! [`GraphicsContext`]: context::GraphicsContext

pub mod camera;
pub mod context;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use rendering::RenderEngine;
