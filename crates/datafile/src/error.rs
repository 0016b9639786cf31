//! Error types for data file access.

use thiserror::Error;

/// Result type for data file operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Error types for data file access.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Operation on a file that is not open
    #[error("File is not open")]
    NotOpen,

    /// The file could not be opened for reading
    #[error("Could not open '{path}': {reason}")]
    OpenFailed { path: String, reason: String },

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Requested counts do not match the variable's rank or the buffer
    #[error("Shape mismatch reading '{name}': {message}")]
    ShapeMismatch { name: String, message: String },

    /// Hyperslab extends past the end of the variable
    #[error("Read of '{name}' out of bounds on axis {axis}: origin {origin} + count {count} > extent {extent}")]
    OutOfBounds {
        name: String,
        axis: usize,
        origin: usize,
        count: usize,
        extent: usize,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON dataset could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FormatError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            message: message.into(),
        }
    }
}
