//! Mesh description and processor decomposition.

use crate::error::{MeshError, MeshResult};
use crate::location::CellLocation;
use crate::partition::Partition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Global mesh description, decomposed over an `nxpe` x `nype` processor grid.
///
/// ```yaml
/// nx: 32
/// ny: 16
/// nz: 8
/// mxg: 2
/// myg: 2
/// nxpe: 2
/// nype: 4
/// target_count: 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Interior points in x (excluding ghost cells)
    pub nx: usize,
    /// Interior points in y (excluding ghost cells)
    pub ny: usize,
    /// Points in the periodic z direction
    pub nz: usize,
    /// Ghost cell width in x
    #[serde(default = "default_guards")]
    pub mxg: usize,
    /// Ghost cell width in y
    #[serde(default = "default_guards")]
    pub myg: usize,
    /// Processors in x
    #[serde(default = "default_procs")]
    pub nxpe: usize,
    /// Processors in y
    #[serde(default = "default_procs")]
    pub nype: usize,
    /// Number of y target regions (1 or 2)
    #[serde(default = "default_targets")]
    pub target_count: usize,
    /// Periodic length of the z domain
    #[serde(default = "default_z_length")]
    pub z_length: f64,
    /// Per-location periodic lengths
    #[serde(default)]
    pub z_length_overrides: BTreeMap<CellLocation, f64>,
}

fn default_guards() -> usize {
    2
}

fn default_procs() -> usize {
    1
}

fn default_targets() -> usize {
    1
}

fn default_z_length() -> f64 {
    std::f64::consts::TAU
}

impl MeshConfig {
    /// Load and validate a mesh description from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded mesh configuration");
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a mesh description from YAML text.
    pub fn from_yaml_str(text: &str) -> MeshResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the mesh can be decomposed as described.
    pub fn validate(&self) -> MeshResult<()> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(MeshError::invalid_config("nx, ny and nz must be > 0"));
        }
        if self.nxpe == 0 || self.nype == 0 {
            return Err(MeshError::invalid_config("nxpe and nype must be > 0"));
        }
        if self.nx % self.nxpe != 0 {
            return Err(MeshError::UnevenDecomposition {
                axis: 'x',
                points: self.nx,
                procs: self.nxpe,
            });
        }
        if self.ny % self.nype != 0 {
            return Err(MeshError::UnevenDecomposition {
                axis: 'y',
                points: self.ny,
                procs: self.nype,
            });
        }
        if !(1..=2).contains(&self.target_count) {
            return Err(MeshError::invalid_config(format!(
                "target_count must be 1 or 2, got {}",
                self.target_count
            )));
        }
        let lengths = std::iter::once(&self.z_length).chain(self.z_length_overrides.values());
        for &length in lengths {
            if !(length.is_finite() && length > 0.0) {
                return Err(MeshError::invalid_config(format!(
                    "z_length must be positive, got {}",
                    length
                )));
            }
        }
        Ok(())
    }

    /// Total number of ranks in the decomposition.
    pub fn num_ranks(&self) -> usize {
        self.nxpe * self.nype
    }

    /// Describe the partition owned by `rank`.
    ///
    /// Ranks are numbered x-fastest: `rank = yproc * nxpe + xproc`.
    pub fn partition(&self, rank: usize) -> MeshResult<Partition> {
        self.validate()?;
        if rank >= self.num_ranks() {
            return Err(MeshError::RankOutOfRange {
                rank,
                ranks: self.num_ranks(),
            });
        }

        let xproc = rank % self.nxpe;
        let yproc = rank / self.nxpe;
        let mxsub = self.nx / self.nxpe;
        let mysub = self.ny / self.nype;

        Ok(Partition {
            global_nx: self.nx + 2 * self.mxg,
            global_ny: self.ny + 2 * self.myg,
            local_nx: mxsub + 2 * self.mxg,
            local_ny: mysub + 2 * self.myg,
            local_nz: self.nz,
            xstart: self.mxg,
            xend: self.mxg + mxsub - 1,
            ystart: self.myg,
            yend: self.myg + mysub - 1,
            offset_x: xproc * mxsub,
            offset_y: yproc * mysub,
            target_count: self.target_count,
            z_length: self.z_length,
            z_length_overrides: self.z_length_overrides.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionLayout;

    fn sample() -> MeshConfig {
        MeshConfig::from_yaml_str(
            "nx: 32\nny: 16\nnz: 8\nmxg: 2\nmyg: 1\nnxpe: 2\nnype: 4\n",
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_from_yaml() {
        let config = MeshConfig::from_yaml_str("nx: 4\nny: 4\nnz: 1\n").unwrap();
        assert_eq!(config.mxg, 2);
        assert_eq!(config.nxpe, 1);
        assert_eq!(config.target_count, 1);
        assert!((config.z_length - std::f64::consts::TAU).abs() < 1e-12);
    }

    #[test]
    fn test_partition_for_rank() {
        let config = sample();
        assert_eq!(config.num_ranks(), 8);

        // rank 5 -> xproc 1, yproc 2
        let p = config.partition(5).unwrap();
        assert_eq!(p.local_nx(), 16 + 4);
        assert_eq!(p.local_ny(), 4 + 2);
        assert_eq!(p.offset_x(), 16);
        assert_eq!(p.offset_y(), 8);
        assert_eq!(p.xstart(), 2);
        assert_eq!(p.xend(), 17);
        assert_eq!(p.yend(), 4);
        assert_eq!(p.global_nx(), 36);
        assert_eq!(p.global_ny(), 18);
    }

    #[test]
    fn test_rank_out_of_range() {
        let err = sample().partition(8).unwrap_err();
        assert!(matches!(err, MeshError::RankOutOfRange { rank: 8, ranks: 8 }));
    }

    #[test]
    fn test_uneven_split_rejected() {
        let err = MeshConfig::from_yaml_str("nx: 10\nny: 4\nnz: 1\nnxpe: 3\n").unwrap_err();
        assert!(matches!(err, MeshError::UnevenDecomposition { axis: 'x', .. }));
    }

    #[test]
    fn test_three_targets_rejected() {
        let err = MeshConfig::from_yaml_str("nx: 4\nny: 4\nnz: 1\ntarget_count: 3\n").unwrap_err();
        assert!(matches!(err, MeshError::InvalidConfig(_)));
    }
}
