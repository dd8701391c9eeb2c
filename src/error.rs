//! Error types for the engines and their file-level helpers.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating, computing or persisting fields.
#[derive(Error, Debug)]
pub enum Error {
    /// Out-of-range parameter or a degenerate grid/sphere.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Geometry the model cannot handle, e.g. a light below the lit plane.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A computation was stopped through its `RenderControl`.
    #[error("computation cancelled")]
    Cancelled,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub(crate) fn invalid_geometry(message: impl Into<String>) -> Self {
        Error::InvalidGeometry(message.into())
    }
}
