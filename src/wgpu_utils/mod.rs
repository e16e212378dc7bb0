//! WGPU utility functions and helpers
//!
//! Thin typed wrappers around `wgpu::Buffer`.

pub mod dynamic_buffer;
pub mod uniform_buffer;

pub use dynamic_buffer::DynamicBuffer;
pub use uniform_buffer::UniformBuffer;
