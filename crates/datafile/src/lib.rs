//! Read access to gridded scientific data files.
//!
//! This crate defines the [`DataFormat`] accessor contract used by the grid
//! loader and provides two backends:
//!
//! - [`MemoryFormat`]: datasets built in code or stored as JSON documents
//! - `NetCdfFormat`: NetCDF-4 files through the native netcdf library
//!   (cargo feature `netcdf`; needs libnetcdf and libhdf5 on the system)
//!
//! # Read model
//!
//! Every read is a hyperslab starting at the accessor's *origin*, a
//! per-handle cursor. [`OriginGuard`] moves the cursor for a scope and puts
//! it back on drop.

pub mod error;
pub mod format;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod native;

pub use error::{FormatError, FormatResult};
pub use format::{hyperslab_indices, hyperslab_ranges, DataFormat, DataValue, OriginGuard};
pub use memory::{MemoryDataset, MemoryFormat, MemoryVariable, VariableData};
#[cfg(feature = "netcdf")]
pub use native::{silence_hdf5_errors, NetCdfFormat};
