use std::path::PathBuf;
use thiserror::Error;

/// Failures while composing the caption line.
#[derive(Debug, Error, PartialEq)]
pub enum CaptionError {
    #[error("focal length is unknown, cannot render caption")]
    UnknownFocalLength,
}

/// Failures while compositing a single image.
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("No template for {make}")]
    UnsupportedDevice { make: String },

    #[error("Asset not found: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("Failed to parse font {}", .0.display())]
    InvalidFont(PathBuf),

    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompositeError {
    /// Errors that mean "this file is out of scope" rather than "this file broke".
    pub fn is_skip(&self) -> bool {
        matches!(self, CompositeError::UnsupportedDevice { .. })
    }
}
