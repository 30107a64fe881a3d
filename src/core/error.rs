//! Error types for the scene crate

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Asset error ({path}): {reason}")]
    Asset { path: PathBuf, reason: String },

    #[error("Shader error: {0}")]
    Shader(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for an asset failure at `path`.
    pub fn asset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
