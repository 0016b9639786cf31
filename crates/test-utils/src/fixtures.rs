//! Common test fixtures for grid loading tests.

/// Standard variable names found in grid files.
pub mod vars {
    pub const DX: &str = "dx";
    pub const Y_BOUNDARY_GUARDS: &str = "y_boundary_guards";
    pub const NY_INNER: &str = "ny_inner";
    pub const NZ: &str = "nz";
}

/// Mesh decompositions used across the test suite.
pub mod mesh {
    use mesh_common::{MeshConfig, Partition};

    /// Serial 30 x 20 mesh with 2 guard cells per side, one z point.
    pub fn serial_30x20() -> Partition {
        Partition::serial(30, 20, 1, 2, 2)
    }

    /// 16 x 12 x 4 mesh split over 2 x 3 ranks.
    pub const SIX_RANKS_YAML: &str = "\
nx: 16
ny: 12
nz: 4
mxg: 2
myg: 2
nxpe: 2
nype: 3
";

    /// 8 x 20 mesh with two target regions split over 4 y ranks.
    pub const SPLIT_TARGETS_YAML: &str = "\
nx: 8
ny: 20
nz: 1
mxg: 1
myg: 2
nxpe: 1
nype: 4
target_count: 2
";

    pub fn six_ranks() -> MeshConfig {
        MeshConfig::from_yaml_str(SIX_RANKS_YAML).expect("fixture mesh is valid")
    }

    pub fn split_targets() -> MeshConfig {
        MeshConfig::from_yaml_str(SPLIT_TARGETS_YAML).expect("fixture mesh is valid")
    }
}
