//! Native NetCDF access using the netcdf library.
//!
//! Enabled with the `netcdf` cargo feature. Each read fetches only the
//! requested hyperslab from the file.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::format::{hyperslab_ranges, DataFormat};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully (e.g. when probing for optional variables like
/// `y_boundary_guards`). Safe to call multiple times; only the first call
/// does anything.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// [`DataFormat`] over a NetCDF file.
#[derive(Default)]
pub struct NetCdfFormat {
    file: Option<netcdf::File>,
    path: Option<PathBuf>,
    origin: Vec<usize>,
}

impl NetCdfFormat {
    pub fn new() -> Self {
        Self::default()
    }

    fn variable(&self, name: &str) -> FormatResult<netcdf::Variable<'_>> {
        let file = self.file.as_ref().ok_or(FormatError::NotOpen)?;
        file.variable(name)
            .ok_or_else(|| FormatError::MissingData(format!("variable {}", name)))
    }

    fn read_region<T>(&self, dest: &mut [T], name: &str, counts: &[usize]) -> FormatResult<()>
    where
        T: netcdf::NcTypeDescriptor + Copy,
    {
        let var = self.variable(name)?;
        let ranges = hyperslab_ranges(name, &self.size(name), &self.origin, counts)?;
        let extents = region_extents(var.dimensions().is_empty(), ranges);

        let values: Vec<T> = var
            .get_values(extents)
            .map_err(|e| FormatError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;
        if values.len() != dest.len() {
            return Err(FormatError::shape_mismatch(
                name,
                format!("buffer holds {} values, hyperslab has {}", dest.len(), values.len()),
            ));
        }
        dest.copy_from_slice(&values);
        Ok(())
    }
}

/// Library extents for a checked hyperslab. Scalar variables take none.
fn region_extents(scalar: bool, ranges: Vec<Range<usize>>) -> Vec<netcdf::Extent> {
    if scalar {
        return Vec::new();
    }
    ranges.into_iter().map(netcdf::Extent::from).collect()
}

impl DataFormat for NetCdfFormat {
    fn open_read(&mut self, path: &Path) -> FormatResult<()> {
        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| FormatError::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "Opened NetCDF file");

        self.file = Some(file);
        self.path = Some(path.to_path_buf());
        self.origin.clear();
        Ok(())
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            if let Some(path) = self.path.take() {
                debug!(path = %path.display(), "Closed NetCDF file");
            }
        }
    }

    fn is_valid(&self) -> bool {
        self.file.is_some()
    }

    fn size(&self, name: &str) -> Vec<usize> {
        match self.variable(name) {
            Ok(var) => {
                let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
                if dims.is_empty() {
                    vec![1]
                } else {
                    dims
                }
            }
            Err(_) => Vec::new(),
        }
    }

    fn read_f64(&self, dest: &mut [f64], name: &str, counts: &[usize]) -> FormatResult<()> {
        self.read_region(dest, name, counts)
    }

    fn read_i32(&self, dest: &mut [i32], name: &str, counts: &[usize]) -> FormatResult<()> {
        self.read_region(dest, name, counts)
    }

    fn origin(&self) -> &[usize] {
        &self.origin
    }

    fn set_origin(&mut self, origin: &[usize]) {
        self.origin = origin.to_vec();
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        let file = self.file.as_ref()?;
        // Checking first avoids HDF5 error spam for absent attributes
        if !file.attributes().any(|attr| attr.name() == name) {
            return None;
        }
        match file.attribute(name)?.value().ok()? {
            netcdf::AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }
}
