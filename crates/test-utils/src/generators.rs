//! Test data generators for synthetic grid files.
//!
//! The index patterns make every cell's value a function of its global
//! position, so a partition can check that each local cell came from the
//! right place in the file.

use std::f64::consts::TAU;

use datafile::MemoryDataset;

/// Value of the 2-D index pattern at global `(x, y)`: `ny * x + y`.
pub fn index_value_2d(ny: usize, x: usize, y: usize) -> f64 {
    (ny * x + y) as f64
}

/// Value of the 3-D index pattern at global `(x, y, z)`: `nz * (ny * x + y) + z`.
pub fn index_value_3d(ny: usize, nz: usize, x: usize, y: usize, z: usize) -> f64 {
    (nz * (ny * x + y) + z) as f64
}

/// An `nx` x `ny` plane of [`index_value_2d`] in row-major order.
///
/// # Example
///
/// ```
/// use test_utils::index_plane;
///
/// let plane = index_plane(3, 4);
/// assert_eq!(plane.len(), 12);
/// assert_eq!(plane[5], 5.0); // x=1, y=1 -> 4*1 + 1
/// ```
pub fn index_plane(nx: usize, ny: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * ny);
    for x in 0..nx {
        for y in 0..ny {
            data.push(index_value_2d(ny, x, y));
        }
    }
    data
}

/// An `nx` x `ny` x `nz` volume of [`index_value_3d`] in row-major order.
pub fn index_volume(nx: usize, ny: usize, nz: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(nx * ny * nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                data.push(index_value_3d(ny, nz, x, y, z));
            }
        }
    }
    data
}

/// Creates a plane with every value set to `value`.
pub fn constant_plane(nx: usize, ny: usize, value: f64) -> Vec<f64> {
    vec![value; nx * ny]
}

/// A grid dataset whose fields hold their own global indices.
///
/// `nx` and `ny` are the extents stored in the file (including any boundary
/// guard cells). Contains:
///
/// - `dx`: constant spacing plane
/// - `f2d`: [`index_plane`]
/// - `f3d`: [`index_volume`] with `nz` z samples
/// - `nz`: the z sample count, so 3-D fields are read directly
pub fn global_index_dataset(nx: usize, ny: usize, nz: usize) -> MemoryDataset {
    MemoryDataset::new()
        .with_real("dx", &[nx, ny], constant_plane(nx, ny, 1.0))
        .with_real("f2d", &[nx, ny], index_plane(nx, ny))
        .with_real("f3d", &[nx, ny, nz], index_volume(nx, ny, nz))
        .with_scalar_int("nz", nz as i32)
}

/// A stored spectral record with `max_mode` modes.
///
/// `modes` lists `(mode, real, imaginary)` entries; every other mode is zero.
///
/// # Example
///
/// ```
/// use test_utils::spectral_record;
///
/// let record = spectral_record(1.5, &[(2, 0.25, -0.5)], 3);
/// assert_eq!(record, vec![1.5, 0.0, 0.0, 0.25, -0.5, 0.0, 0.0]);
/// ```
pub fn spectral_record(dc: f64, modes: &[(usize, f64, f64)], max_mode: usize) -> Vec<f64> {
    let mut record = vec![0.0; 2 * max_mode + 1];
    record[0] = dc;
    for &(mode, re, im) in modes {
        assert!(
            (1..=max_mode).contains(&mode),
            "mode {} outside 1..={}",
            mode,
            max_mode
        );
        record[2 * mode - 1] = re;
        record[2 * mode] = im;
    }
    record
}

/// Physical samples of a single Fourier component on `nz` points.
///
/// Matches an unnormalized inverse real transform: the component at local
/// index `k` contributes `2 * (re * cos(2πkz/nz) - im * sin(2πkz/nz))`.
pub fn single_mode_samples(nz: usize, dc: f64, k: usize, re: f64, im: f64) -> Vec<f64> {
    (0..nz)
        .map(|z| {
            let phase = TAU * (k * z) as f64 / nz as f64;
            dc + 2.0 * (re * phase.cos() - im * phase.sin())
        })
        .collect()
}
