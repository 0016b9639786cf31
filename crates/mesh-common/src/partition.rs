//! The portion of a decomposed mesh owned by one rank.

use crate::location::CellLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only view of one partition of a decomposed mesh.
///
/// Index conventions:
/// - `global_nx` / `global_ny` count the whole mesh *including* one set of
///   ghost cells on each side (`2 * xstart`, `2 * ystart`).
/// - `local_*` extents count this partition's array including its ghosts.
/// - `xstart..=xend` / `ystart..=yend` are the local interior index ranges.
/// - `offset_x` / `offset_y` locate local index 0 in the global index space
///   (the first interior cell of the partition sits at global interior index
///   `offset`).
pub trait PartitionLayout {
    fn global_nx(&self) -> usize;
    fn global_ny(&self) -> usize;

    fn local_nx(&self) -> usize;
    fn local_ny(&self) -> usize;
    fn local_nz(&self) -> usize;

    fn xstart(&self) -> usize;
    fn xend(&self) -> usize;
    fn ystart(&self) -> usize;
    fn yend(&self) -> usize;

    fn offset_x(&self) -> usize;
    fn offset_y(&self) -> usize;

    /// Number of separate periodic target regions in y (1 or 2 are supported).
    fn target_count(&self) -> usize;

    /// Length of the periodic z domain for fields at `location`.
    fn z_length(&self, location: CellLocation) -> f64;

    /// Number of interior points in x on this partition.
    fn interior_nx(&self) -> usize {
        self.xend() + 1 - self.xstart()
    }

    /// Number of interior points in y on this partition.
    fn interior_ny(&self) -> usize {
        self.yend() + 1 - self.ystart()
    }
}

/// Concrete partition descriptor, usually produced by
/// [`MeshConfig::partition`](crate::MeshConfig::partition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub global_nx: usize,
    pub global_ny: usize,
    pub local_nx: usize,
    pub local_ny: usize,
    pub local_nz: usize,
    pub xstart: usize,
    pub xend: usize,
    pub ystart: usize,
    pub yend: usize,
    pub offset_x: usize,
    pub offset_y: usize,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Periodic z length for cell-centred fields
    pub z_length: f64,
    /// Per-location z lengths that differ from `z_length`
    #[serde(default)]
    pub z_length_overrides: BTreeMap<CellLocation, f64>,
}

fn default_target_count() -> usize {
    1
}

impl Partition {
    /// A single partition covering an `nx` x `ny` x `nz` interior with
    /// `mxg` / `myg` ghost cells and a full 2π periodic z domain.
    pub fn serial(nx: usize, ny: usize, nz: usize, mxg: usize, myg: usize) -> Self {
        Self {
            global_nx: nx + 2 * mxg,
            global_ny: ny + 2 * myg,
            local_nx: nx + 2 * mxg,
            local_ny: ny + 2 * myg,
            local_nz: nz,
            xstart: mxg,
            xend: mxg + nx - 1,
            ystart: myg,
            yend: myg + ny - 1,
            offset_x: 0,
            offset_y: 0,
            target_count: 1,
            z_length: std::f64::consts::TAU,
            z_length_overrides: BTreeMap::new(),
        }
    }

    /// Set the periodic z length for all locations without an override.
    pub fn with_z_length(mut self, z_length: f64) -> Self {
        self.z_length = z_length;
        self
    }

    /// Set the number of y target regions.
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }
}

impl PartitionLayout for Partition {
    fn global_nx(&self) -> usize {
        self.global_nx
    }

    fn global_ny(&self) -> usize {
        self.global_ny
    }

    fn local_nx(&self) -> usize {
        self.local_nx
    }

    fn local_ny(&self) -> usize {
        self.local_ny
    }

    fn local_nz(&self) -> usize {
        self.local_nz
    }

    fn xstart(&self) -> usize {
        self.xstart
    }

    fn xend(&self) -> usize {
        self.xend
    }

    fn ystart(&self) -> usize {
        self.ystart
    }

    fn yend(&self) -> usize {
        self.yend
    }

    fn offset_x(&self) -> usize {
        self.offset_x
    }

    fn offset_y(&self) -> usize {
        self.offset_y
    }

    fn target_count(&self) -> usize {
        self.target_count
    }

    fn z_length(&self, location: CellLocation) -> f64 {
        self.z_length_overrides
            .get(&location)
            .copied()
            .unwrap_or(self.z_length)
    }
}
