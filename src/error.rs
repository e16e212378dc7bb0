//! Error types shared across the editor.
//!
//! Almost every failure in the editor is recoverable: a missing scene file, an
//! unknown object type or an exhausted light pool is logged and the frame loop
//! carries on. [`EditorError`] gives those failures a name so callers can decide
//! how loudly to report them.

use std::path::PathBuf;

use thiserror::Error;

use crate::gfx::scene::ObjectKind;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("scene file not found: {}", .0.display())]
    SceneNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),

    #[error("no light slots available (pool capacity {capacity})")]
    LightSlotsExhausted { capacity: usize },

    #[error("failed to load mesh {}: {source}", path.display())]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("{0} objects need a source file")]
    MissingSource(ObjectKind),

    #[error("unknown panel command `{0}`")]
    UnknownCommand(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
