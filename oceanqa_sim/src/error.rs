//! Error types for the dataset build harness.

use oceanqa_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, writing or reading a dataset.
#[derive(Debug, Error)]
pub enum SimError {
    /// Scene or question data outside the catalog
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `video.json` could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame image could not be encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// A video directory holds no `video.json`
    #[error("No video.json found in {}", .0.display())]
    MissingVideo(PathBuf),

    /// Output directory already exists and overwriting was not requested
    #[error("Output directory {} already exists (use --force to replace it)", .0.display())]
    OutputExists(PathBuf),
}

impl SimError {
    /// Creates a missing-video error.
    pub fn missing_video(dir: impl Into<PathBuf>) -> Self {
        Self::MissingVideo(dir.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
