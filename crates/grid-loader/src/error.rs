//! Error types for grid loading.
//!
//! Everything here is fatal for the current load. Recoverable outcomes
//! (absent variables, wrong rank) are reported through
//! [`FieldSource::Default`](crate::FieldSource::Default) or `None` instead.

use datafile::FormatError;
use thiserror::Error;

/// Errors that abort a grid file operation.
#[derive(Error, Debug)]
pub enum GridLoaderError {
    /// The grid file could not be opened.
    #[error("could not open file '{path}'")]
    OpenFailed {
        path: String,
        #[source]
        source: FormatError,
    },

    /// The underlying file handle is no longer usable.
    #[error("file '{path}' cannot be read")]
    FileUnreadable { path: String },

    /// A 1-D variable with more than one element where a field was expected.
    #[error("expecting a 2D variable, but '{name}' is 1D with {len} elements")]
    NotTwoDimensional { name: String, len: usize },

    /// A single-element variable could not be read.
    #[error("couldn't read 0D variable '{name}'")]
    ScalarReadFailed {
        name: String,
        #[source]
        source: FormatError,
    },

    /// The partition's ghost cells are not the same width on both sides.
    #[error("{axis} ghost cells do not split evenly: local extent {local}, interior {interior}")]
    UnevenGhostCells {
        axis: char,
        local: usize,
        interior: usize,
    },

    /// The x extent in the file matches neither padding convention.
    #[error(
        "could not read '{name}' from file: x extent {file_nx} is neither the interior \
         extent {interior_nx} nor the interior plus an even number of boundary guard cells"
    )]
    XGuardConvention {
        name: String,
        file_nx: usize,
        interior_nx: usize,
    },

    /// The y extent in the file does not match the stored y guard count.
    #[error(
        "could not read '{name}' from file: y extent {file_ny} does not match {expected_ny} \
         expected for y_boundary_guards={grid_yguards}"
    )]
    YGuardConvention {
        name: String,
        file_ny: usize,
        expected_ny: usize,
        grid_yguards: usize,
    },

    /// The file stores fewer boundary guard cells than the partition needs.
    #[error(
        "could not read '{name}' from file: {file_guards} {axis} boundary guard cells in the \
         file, but the partition has {local_guards}"
    )]
    TooFewGuardCells {
        name: String,
        axis: char,
        file_guards: usize,
        local_guards: usize,
    },

    /// A 3-D variable's z extent differs from the partition's.
    #[error("3D variable '{name}' has incorrect size {found} (expecting {expected})")]
    NzMismatch {
        name: String,
        found: usize,
        expected: usize,
    },

    /// Only one or two y target regions are supported.
    #[error("unsupported number of y target regions: {0} (expected 1 or 2)")]
    UnsupportedTargets(usize),

    /// The periodic z length does not give a whole number of periods in 2π.
    #[error("cannot decode '{name}': z length {z_length} gives no whole period in 2π")]
    InvalidZPeriod { name: String, z_length: f64 },

    /// Reading one x column of a 2-D field failed.
    #[error("could not fetch data for '{name}'")]
    ColumnReadFailed {
        name: String,
        #[source]
        source: FormatError,
    },

    /// A 3-D decoder gave up on the variable.
    #[error("could not read '{name}' from grid")]
    DecodeFailed { name: String },

    /// Invalid loader configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GridLoaderError {
    /// Create a FileUnreadable error.
    pub fn file_unreadable(path: impl Into<String>) -> Self {
        Self::FileUnreadable { path: path.into() }
    }

    /// Create a DecodeFailed error.
    pub fn decode_failed(name: impl Into<String>) -> Self {
        Self::DecodeFailed { name: name.into() }
    }
}

/// Result type for grid loader operations.
pub type Result<T> = std::result::Result<T, GridLoaderError>;
