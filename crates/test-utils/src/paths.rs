//! Path utilities for locating test data files.
//!
//! Grid files in NetCDF format are too large to keep in the repository, so
//! tests that need them look in a few well-known places and skip otherwise.

use std::path::{Path, PathBuf};

use datafile::MemoryDataset;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// Checked in order:
/// 1. `TEST_DATA_DIR` (if set)
/// 2. `crates/datafile/testdata/`
/// 3. `crates/grid-loader/testdata/`
/// 4. `testdata/` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("datafile").join(name),
        crate_testdata_dir("grid-loader").join(name),
        root.join("testdata").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Write `dataset` as JSON to `dir/name` and return the path.
pub fn write_json_dataset(dir: &Path, name: &str, dataset: &MemoryDataset) -> PathBuf {
    let path = dir.join(name);
    let json = dataset
        .to_json_string()
        .expect("Failed to serialize test dataset");
    std::fs::write(&path, json).expect("Failed to write test dataset");
    path
}
