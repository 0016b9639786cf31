//! Common types shared by the grid loader crates.
//!
//! - [`Partition`] / [`PartitionLayout`]: the slice of a decomposed mesh owned
//!   by one rank, with its ghost cells
//! - [`MeshConfig`]: global mesh description and processor decomposition
//! - [`Field2D`] / [`Field3D`]: dense local field storage

pub mod config;
pub mod error;
pub mod field;
pub mod location;
pub mod partition;

pub use config::MeshConfig;
pub use error::{MeshError, MeshResult};
pub use field::{Field2D, Field3D, FieldBuffer};
pub use location::CellLocation;
pub use partition::{Partition, PartitionLayout};
