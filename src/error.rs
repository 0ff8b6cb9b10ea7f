//! Engine error type.
//!
//! Only recoverable or load-time failures are values. Contract violations
//! (unregistered definition lookups during gameplay, reading a component an
//! entity never had, frame indices out of range) panic at the call site.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which definition registry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefKind {
    Tile,
    Entity,
    Subworld,
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefKind::Tile => f.write_str("tile"),
            DefKind::Entity => f.write_str("entity"),
            DefKind::Subworld => f.write_str("subworld"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The same definition id was registered twice while loading content, or
    /// a level file lists one subworld id twice.
    #[error("{kind} redefinition: '{id}' is already registered")]
    Redefinition { kind: DefKind, id: String },

    /// Content refers to a definition that was never registered.
    #[error("unknown {kind} definition '{id}'")]
    UnknownDefinition { kind: DefKind, id: String },

    #[error("tile layer holds {actual} tiles, expected {expected}")]
    LayerSize { expected: usize, actual: usize },

    #[error("tile index {index} is outside the layer palette")]
    UnknownTileIndex { index: u32 },

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 layer data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
