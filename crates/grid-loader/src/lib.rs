//! Partition-local loading of global grid files.
//!
//! A grid file holds every field of a structured mesh on the global index
//! space. Each partition of a domain decomposition opens the file through a
//! [`GridFile`] and pulls out only its own block, including ghost cells:
//!
//! - ghost cells stored in the file are read directly
//! - ghost cells missing from the file are filled by edge replication
//! - 3-D fields are stored either sample by sample along z or as a truncated
//!   Fourier series per (x, y) point, selected by the presence of `nz`
//!
//! # Example
//!
//! ```ignore
//! use datafile::MemoryFormat;
//! use grid_loader::GridFile;
//! use mesh_common::Partition;
//!
//! let partition = Partition::serial(30, 20, 16, 2, 2);
//! let mut grid = GridFile::open(MemoryFormat::json(), "grid.json")?;
//! let rxy = grid.load_field_2d(&partition, "Rxy", 1.0)?;
//! if !rxy.found() {
//!     println!("Rxy defaulted");
//! }
//! ```

pub mod boundary;
pub mod config;
pub mod decode;
pub mod error;
pub mod fft;
pub mod gridfile;
pub mod loader;
pub mod mapping;

pub use config::{GridFileConfig, VariableNames};
pub use decode::{ModeSelection, ReadWindow};
pub use error::{GridLoaderError, Result};
pub use gridfile::GridFile;
pub use loader::{FieldRead, FieldSource};
pub use mapping::{AxisMapping, IndexMapping};
