//! Direct z decoding: every sample stored in the file.

use datafile::{DataFormat, OriginGuard};
use mesh_common::Field3D;
use tracing::warn;

use super::ReadWindow;

/// Copy the full z record of every (x, y) in `window` into `field`.
///
/// Returns `false` if the window does not fit the field, the variable is not
/// 3-D with the field's z extent, or any read fails (remaining reads are
/// skipped). The format's origin is restored in every case.
pub fn read_direct<F: DataFormat + ?Sized>(
    format: &mut F,
    name: &str,
    window: &ReadWindow,
    field: &mut Field3D,
) -> bool {
    if !window.fits(field.nx(), field.ny()) {
        warn!(name, ?window, "Read window does not fit the destination");
        return false;
    }

    let size = format.size(name);
    if size.len() != 3 {
        warn!(name, dims = size.len(), "Number of dimensions incorrect");
        return false;
    }
    let nz = size[2];
    if nz != field.nz() {
        warn!(name, file_nz = nz, field_nz = field.nz(), "z extent differs from destination");
        return false;
    }

    let mut cursor = OriginGuard::new(format, &[]);
    for ((gx, gy), (lx, ly)) in window.points() {
        cursor.reposition(&[gx, gy]);
        if let Err(e) = cursor.read_f64(field.point_mut(lx, ly), name, &[1, 1, nz]) {
            warn!(name, x = gx, y = gy, error = %e, "Failed to read z record");
            return false;
        }
    }
    true
}
