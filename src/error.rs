//! Errors for the fallible edges of the crate: configuration, export and
//! snapshots. The numeric kernels themselves cannot fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FluidError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot does not match grid: expected {expected} cells, got {got}")]
    SnapshotMismatch { expected: usize, got: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, FluidError>;
