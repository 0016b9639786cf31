//! Spectral z decoding.
//!
//! Each (x, y) point stores an odd-length record
//!
//! ```text
//! DC, r1, i1, r2, i2, ..., rn, in
//! ```
//!
//! holding the real and imaginary parts of the positive toroidal mode
//! numbers up to `n`. A domain covering `1/zperiod` of the full torus can
//! only represent mode numbers that are multiples of `zperiod`, so local
//! Fourier index `i` takes stored mode `i * zperiod`.

use datafile::{DataFormat, OriginGuard};
use mesh_common::{Field3D, FieldBuffer, PartitionLayout};
use num_complex::Complex64;
use std::f64::consts::TAU;
use tracing::{info, warn};

use super::ReadWindow;
use crate::error::{GridLoaderError, Result};
use crate::fft::irfft;

/// Which stored modes a decode will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSelection {
    /// Highest mode number stored in the file.
    pub max_mode: usize,
    /// Stored mode numbers per local Fourier index.
    pub zperiod: usize,
    /// Highest stored mode number that will be used (0 = DC only).
    pub highest_used: usize,
}

impl ModeSelection {
    /// A `zperiod` of 0 is treated as 1.
    pub fn new(max_mode: usize, zperiod: usize, nz: usize) -> Self {
        let zperiod = zperiod.max(1);
        let highest_used = if zperiod > max_mode {
            0
        } else {
            // Largest multiple of zperiod in the file, limited by z resolution
            ((max_mode / zperiod) * zperiod).min((nz / 2) * zperiod)
        };
        Self {
            max_mode,
            zperiod,
            highest_used,
        }
    }

    /// Mode numbers read from the file, starting with DC.
    pub fn modes(&self) -> Vec<usize> {
        std::iter::once(0)
            .chain(
                (1..)
                    .map(|i| i * self.zperiod)
                    .take_while(|&m| m <= self.highest_used),
            )
            .collect()
    }

    fn log(&self, name: &str) {
        if self.zperiod > self.max_mode {
            warn!(
                name,
                zperiod = self.zperiod,
                max_mode = self.max_mode,
                "zperiod > maxmode => Only reading n = 0 component"
            );
        } else if self.highest_used == 0 {
            info!(name, "Reading n = 0");
        } else if self.highest_used == self.zperiod {
            info!(name, "Reading n = 0, {}", self.zperiod);
        } else {
            info!(name, "Reading n = 0, {} ... {}", self.zperiod, self.highest_used);
        }
    }
}

/// Number of whole periods of a z domain of length `z_length` in 2π.
pub(crate) fn zperiod_for(name: &str, z_length: f64) -> Result<usize> {
    let periods = (TAU / z_length).round();
    if !(periods.is_finite() && periods >= 1.0) {
        return Err(GridLoaderError::InvalidZPeriod {
            name: name.to_string(),
            z_length,
        });
    }
    Ok(periods as usize)
}

/// Rebuild the z samples of every (x, y) in `window` from stored Fourier modes.
///
/// The periodic length comes from `partition` at the field's location.
/// Returns `Ok(false)` for an invalid window, a variable that is not 3-D or
/// any failed read; a z length with no whole period in 2π is an error.
pub fn read_spectral<F, P>(
    format: &mut F,
    partition: &P,
    name: &str,
    window: &ReadWindow,
    field: &mut Field3D,
) -> Result<bool>
where
    F: DataFormat + ?Sized,
    P: PartitionLayout + ?Sized,
{
    if !window.fits(field.nx(), field.ny()) {
        warn!(name, ?window, "Read window does not fit the destination");
        return Ok(false);
    }

    let size = format.size(name);
    if size.len() != 3 || size[2] == 0 {
        warn!(name, dims = ?size, "Number of dimensions incorrect");
        return Ok(false);
    }

    let record_len = size[2];
    let max_mode = (record_len - 1) / 2;
    let ncz = field.nz();
    let zperiod = zperiod_for(name, partition.z_length(field.location()))?;

    let selection = ModeSelection::new(max_mode, zperiod, ncz);
    selection.log(name);

    let mut zdata = vec![0.0; record_len];
    let mut fdata = vec![Complex64::default(); ncz / 2 + 1];

    let mut cursor = OriginGuard::new(format, &[]);
    for ((gx, gy), (lx, ly)) in window.points() {
        cursor.reposition(&[gx, gy]);
        if let Err(e) = cursor.read_f64(&mut zdata, name, &[1, 1, record_len]) {
            warn!(name, x = gx, y = gy, error = %e, "Failed to read mode record");
            return Ok(false);
        }

        fdata[0] = Complex64::new(zdata[0], 0.0);
        for (i, coeff) in fdata.iter_mut().enumerate().skip(1) {
            let mode = i * zperiod;
            *coeff = if mode <= max_mode {
                Complex64::new(zdata[2 * mode - 1], zdata[2 * mode])
            } else {
                Complex64::default()
            };
        }

        irfft(&fdata, field.point_mut(lx, ly));
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_limited_by_file() {
        // 7 stored values -> max mode 3; zperiod 2; nz 8 allows up to 8
        let sel = ModeSelection::new(3, 2, 8);
        assert_eq!(sel.highest_used, 2);
        assert_eq!(sel.modes(), vec![0, 2]);
    }

    #[test]
    fn test_modes_limited_by_resolution() {
        let sel = ModeSelection::new(10, 1, 4);
        assert_eq!(sel.modes(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dc_only_when_zperiod_exceeds_max_mode() {
        let sel = ModeSelection::new(2, 3, 16);
        assert_eq!(sel.modes(), vec![0]);
    }

    #[test]
    fn test_zperiod_rounding() {
        assert_eq!(zperiod_for("f", TAU).unwrap(), 1);
        assert_eq!(zperiod_for("f", TAU / 5.0 * 1.01).unwrap(), 5);
        assert!(matches!(
            zperiod_for("f", 3.0 * TAU),
            Err(GridLoaderError::InvalidZPeriod { .. })
        ));
    }
}
