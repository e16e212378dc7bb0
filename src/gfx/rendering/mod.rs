//! Core rendering functionality
//!
//! Draw calls are recorded on the CPU by [`FrameRecorder`] and replayed on
//! the GPU by [`RenderEngine`].

pub mod frame;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shadow;

pub use frame::{FrameRecorder, RecordedFrame};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{RenderEngine, ViewportFrame};
pub use shadow::{planar_shadow_matrix, SHADOW_PLANE_Y};
