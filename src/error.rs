//! Error types for the OBJ importer.

use thiserror::Error;

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Main error type for OBJ import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file contained no position records after the metadata scan.
    #[error("OBJ file contains no vertex positions")]
    MissingGeometry,

    /// I/O error while streaming the OBJ file or reading a texture.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode a texture image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The material library could not be resolved.
    #[error("Material resolution error: {0}")]
    MaterialResolution(String),

    /// A referenced texture could not be resolved.
    #[error("Image resolution error: {0}")]
    ImageResolution(String),
}
