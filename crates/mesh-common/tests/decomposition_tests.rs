//! Decomposition tests for MeshConfig.

use mesh_common::{CellLocation, MeshConfig, PartitionLayout};
use std::io::Write;

const MESH_YAML: &str = r#"
nx: 12
ny: 8
nz: 4
mxg: 1
myg: 2
nxpe: 3
nype: 2
target_count: 2
z_length: 3.14159
z_length_overrides:
  zlow: 1.5
"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MESH_YAML.as_bytes()).unwrap();

    let config = MeshConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.num_ranks(), 6);
    assert_eq!(config.target_count, 2);
    assert_eq!(config.z_length_overrides.get(&CellLocation::ZLow), Some(&1.5));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = MeshConfig::from_yaml_file("/nonexistent/mesh.yaml").unwrap_err();
    assert!(matches!(err, mesh_common::MeshError::Io(_)));
}

#[test]
fn test_partitions_tile_the_interior() {
    let config = MeshConfig::from_yaml_str(MESH_YAML).unwrap();
    let mut covered = vec![0usize; config.nx * config.ny];

    for rank in 0..config.num_ranks() {
        let p = config.partition(rank).unwrap();
        assert_eq!(p.local_nx() - p.interior_nx(), 2 * config.mxg);
        assert_eq!(p.local_ny() - p.interior_ny(), 2 * config.myg);

        for x in 0..p.interior_nx() {
            for y in 0..p.interior_ny() {
                let gx = p.offset_x() + x;
                let gy = p.offset_y() + y;
                covered[gx * config.ny + gy] += 1;
            }
        }
    }

    assert!(covered.iter().all(|&n| n == 1), "every interior cell owned exactly once");
}

#[test]
fn test_partition_z_length_by_location() {
    let config = MeshConfig::from_yaml_str(MESH_YAML).unwrap();
    let p = config.partition(0).unwrap();
    assert!((p.z_length(CellLocation::Centre) - 3.14159).abs() < 1e-12);
    assert!((p.z_length(CellLocation::ZLow) - 1.5).abs() < 1e-12);
}
