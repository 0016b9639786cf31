//! Fixtures shared by the grid loader test suites.
//!
//! Grid files are produced in memory from closed-form index functions so
//! every loaded value can be checked against the global position it came
//! from. Real NetCDF grids are looked up under `TEST_DATA_DIR` and the tests
//! that need one skip themselves when it is missing.
//!
//! ```ignore
//! use test_utils::{global_index_dataset, mesh};
//!
//! let config = mesh::six_ranks();
//! let dataset = global_index_dataset(config.nx + 4, config.ny, config.nz);
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a grid file under the test data directory, or end the calling
/// test early with a note on stderr.
///
/// ```ignore
/// #[test]
/// fn test_native_grid_has_guards() {
///     let path = require_test_file!("torus_grid.nc");
///     let mut grid = GridFile::open(NetCdfFormat::new(), &path).unwrap();
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "skipping: grid file '{}' not in TEST_DATA_DIR or a testdata directory",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two decoded samples agree to within `epsilon`.
///
/// Both sides are widened to `f64`, so integer literals and `f32` values
/// compare against `f64` fields without casts.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "samples differ: {} vs {} (|diff| {} > {})",
                left, right, diff, epsilon
            );
        }
    }};
}
