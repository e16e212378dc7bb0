//! # Scene Management Module
//!
//! Objects, their transforms and the scene that owns them.
//!
//! - [`Scene`] - object list, cameras, interaction state, persistence
//! - [`SceneObject`] - one primitive, light or mesh with its [`Transform`]
//! - [`LightPool`] - fixed set of light slots handed out to light objects
//! - [`Vertex3D`] - GPU vertex layout of recorded frames

pub mod lights;
pub mod object;
pub mod scene;
pub mod transform;
pub mod vertex;

// Re-export main types
pub use lights::{LightPool, LightSlot, LightSource};
pub use object::{ObjectKind, SceneObject, Shape, ShearPlane};
pub use scene::{LoadSummary, ObjectRequest, Scene};
pub use transform::{Axis, Transform};
pub use vertex::Vertex3D;
