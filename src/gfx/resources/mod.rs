//! GPU resource management
//!
//! Depth buffers and the per-viewport global uniforms.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform, GpuLight, MAX_LIGHTS};
pub use texture_resource::TextureResource;
