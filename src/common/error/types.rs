//! Unified error types for chartdeck.
use thiserror::Error;

/// Main error type for chartdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised while writing the presentation package
    #[error("Presentation error: {0}")]
    Presentation(String),

    /// Invalid or unsupported image data
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A figure could not be rendered
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid slide geometry
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),
}

/// Result type for chartdeck operations.
pub type Result<T> = std::result::Result<T, Error>;
