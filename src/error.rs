//! Crate error type

use std::path::PathBuf;

use crate::config::ValidationError;

/// Errors produced while configuring, loading data for, or training a GAN
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid config: {0}")]
    Validation(#[from] ValidationError),

    #[error("Dataset directory does not exist: {0}")]
    DatasetNotFound(PathBuf),

    #[error("No images found under {0} (expected .png, .jpg, .jpeg, .bmp or .gif files)")]
    EmptyDataset(PathBuf),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Shape mismatch after {layer}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { layer: String, expected: Vec<usize>, actual: Vec<usize> },

    #[error("Invalid input to {layer}: {reason}")]
    InvalidInput { layer: &'static str, reason: String },

    #[error("{0}: backward called without a recorded forward pass")]
    MissingForward(&'static str),

    #[error("Non-finite {phase} loss at step {step}: {value}")]
    NonFiniteLoss { phase: &'static str, step: usize, value: f32 },

    #[error("Data loader failed: {0}")]
    Loader(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(layer: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { layer, reason: reason.into() }
    }
}
