//! Opening grid files and reading options and vectors.

use datafile::{MemoryDataset, MemoryFormat};
use grid_loader::{GridFile, GridFileConfig, GridLoaderError};
use test_utils::{global_index_dataset, temp_test_dir, write_json_dataset, vars};

fn options_dataset() -> MemoryDataset {
    MemoryDataset::new()
        .with_attribute("grid_id", "tokamak-7")
        .with_scalar_int("ixseps1", 12)
        .with_scalar_real("rmag", 1.75)
        .with_int("jyseps", &[4], vec![3, 7, 11, 15])
        .with_real("zshift", &[5], vec![0.0, 0.5, 1.0, 1.5, 2.0])
}

fn open(dataset: MemoryDataset) -> GridFile<MemoryFormat> {
    GridFile::open(MemoryFormat::from_dataset(dataset), "grid.nc").unwrap()
}

#[test]
fn test_open_missing_json_fails() {
    let err = GridFile::open(MemoryFormat::json(), "/nonexistent/grid.json").err().unwrap();
    assert!(matches!(err, GridLoaderError::OpenFailed { .. }));
    assert!(err.to_string().contains("/nonexistent/grid.json"));
}

#[test]
fn test_open_json_file() {
    let dir = temp_test_dir();
    let dataset = global_index_dataset(6, 4, 2).with_scalar_int(vars::Y_BOUNDARY_GUARDS, 1);
    let path = write_json_dataset(dir.path(), "grid.json", &dataset);

    let grid = GridFile::open(MemoryFormat::json(), &path).unwrap();
    assert_eq!(grid.path(), path.as_path());
    assert_eq!(grid.y_boundary_guards(), 1);
    assert!(grid.has_var("f3d"));
    assert!(grid.has_var(vars::NZ));
    assert!(!grid.has_var("absent"));
}

#[test]
fn test_scalar_options() {
    let grid = open(options_dataset());
    assert_eq!(grid.get_int("ixseps1").unwrap(), Some(12));
    assert_eq!(grid.get_real("rmag").unwrap(), Some(1.75));
    assert_eq!(grid.get_real("ixseps1").unwrap(), Some(12.0));
    assert_eq!(grid.get_string("grid_id").unwrap().as_deref(), Some("tokamak-7"));

    assert_eq!(grid.get_int("absent").unwrap(), None);
    assert_eq!(grid.get_string("absent").unwrap(), None);
}

#[test]
fn test_vector_reads_at_offset() {
    let mut grid = open(options_dataset());
    assert_eq!(grid.get_int_vector("jyseps", 2, 1), Some(vec![7, 11]));
    assert_eq!(grid.get_real_vector("zshift", 5, 0), Some(vec![0.0, 0.5, 1.0, 1.5, 2.0]));

    // Past the end and absent variables are not fatal
    assert_eq!(grid.get_int_vector("jyseps", 3, 2), None);
    assert_eq!(grid.get_real_vector("absent", 1, 0), None);

    // The cursor is back at the origin afterwards
    assert_eq!(grid.get_int("ixseps1").unwrap(), Some(12));
    assert_eq!(grid.get_int_vector("jyseps", 1, 0), Some(vec![3]));
}

#[test]
fn test_custom_variable_names() {
    let mut config = GridFileConfig::default();
    config.variables.y_boundary_guards = "jyguards".to_string();
    let dataset = MemoryDataset::new()
        .with_scalar_int("jyguards", 2)
        .with_scalar_int(vars::Y_BOUNDARY_GUARDS, 5);

    let grid = GridFile::open_with_config(MemoryFormat::from_dataset(dataset), "grid.nc", config).unwrap();
    assert_eq!(grid.y_boundary_guards(), 2);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = GridFileConfig::default();
    config.variables.nz = String::new();

    let err = GridFile::open_with_config(MemoryFormat::from_dataset(MemoryDataset::new()), "grid.nc", config)
        .err()
        .unwrap();
    assert!(matches!(err, GridLoaderError::Config(_)));
}
