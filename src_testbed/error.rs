//! Errors reported by the testbed.

use thiserror::Error;

/// Testbed result type.
pub type Result<T> = std::result::Result<T, TestbedError>;

#[derive(Debug, Error)]
pub enum TestbedError {
    #[error("unknown example: {0:?}")]
    UnknownScene(String),

    #[error("an example named {0:?} is already registered")]
    DuplicateScene(&'static str),

    #[error("example index {index} is out of range ({len} registered)")]
    SceneIndexOutOfRange { index: usize, len: usize },

    #[error("no example registered")]
    NoScenes,

    #[error("invalid argument {arg}: {reason}")]
    InvalidArgument { arg: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}
