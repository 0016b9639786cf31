//! Grid file handle: open/close, metadata and scalar/vector reads.

use std::path::{Path, PathBuf};

use datafile::{DataFormat, DataValue, OriginGuard};
use mesh_common::PartitionLayout;
use tracing::{debug, info, instrument, warn};

use crate::config::GridFileConfig;
use crate::error::{GridLoaderError, Result};

/// An open grid file.
///
/// Owns its [`DataFormat`] for the whole lifetime and closes it on drop.
/// All reads take `&mut self` because they move the format's origin.
pub struct GridFile<F: DataFormat> {
    pub(crate) file: F,
    pub(crate) path: PathBuf,
    pub(crate) config: GridFileConfig,
    pub(crate) y_boundary_guards: usize,
    pub(crate) ny_inner: usize,
}

impl<F: DataFormat> GridFile<F> {
    /// Open `path` with `format` using the standard variable names.
    pub fn open(format: F, path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(format, path, GridFileConfig::default())
    }

    /// Open `path` with `format`.
    ///
    /// Fails if the file cannot be opened. The optional `y_boundary_guards`
    /// and `ny_inner` values default to 0 when absent.
    pub fn open_with_config(
        mut format: F,
        path: impl AsRef<Path>,
        config: GridFileConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        config.validate().map_err(GridLoaderError::Config)?;

        format
            .open_read(path)
            .map_err(|source| GridLoaderError::OpenFailed {
                path: path.display().to_string(),
                source,
            })?;
        format.set_origin(&[]);

        let y_boundary_guards = read_optional_count(&format, &config.variables.y_boundary_guards);
        let ny_inner = read_optional_count(&format, &config.variables.ny_inner);

        debug!(
            path = %path.display(),
            y_boundary_guards,
            ny_inner,
            "Opened grid file"
        );

        Ok(Self {
            file: format,
            path: path.to_path_buf(),
            config,
            y_boundary_guards,
            ny_inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of y boundary guard cells stored in the file.
    pub fn y_boundary_guards(&self) -> usize {
        self.y_boundary_guards
    }

    /// y index of the second target region (0 if not given).
    pub fn ny_inner(&self) -> usize {
        self.ny_inner
    }

    pub fn config(&self) -> &GridFileConfig {
        &self.config
    }

    /// Whether `name` exists in the file. False if the file is unusable.
    pub fn has_var(&self, name: &str) -> bool {
        if !self.file.is_valid() {
            return false;
        }
        !self.file.size(name).is_empty()
    }

    /// Read a file-level string attribute.
    #[instrument(level = "debug", skip(self), fields(file = %self.path.display()))]
    pub fn get_string(&self, name: &str) -> Result<Option<String>> {
        self.ensure_readable()?;

        let value = self.file.global_attribute(name);
        if let Some(ref s) = value {
            info!(option = name, value = %s, source = %self.path.display(), "Read option");
        }
        Ok(value)
    }

    /// Read a single integer.
    #[instrument(level = "debug", skip(self), fields(file = %self.path.display()))]
    pub fn get_int(&self, name: &str) -> Result<Option<i32>> {
        self.get_scalar::<i32>(name)
    }

    /// Read a single real.
    #[instrument(level = "debug", skip(self), fields(file = %self.path.display()))]
    pub fn get_real(&self, name: &str) -> Result<Option<f64>> {
        self.get_scalar::<f64>(name)
    }

    fn get_scalar<T: DataValue>(&self, name: &str) -> Result<Option<T>> {
        self.ensure_readable()?;

        let size = self.file.size(name);
        if size.is_empty() {
            return Ok(None);
        }

        let mut value = [T::default()];
        let counts = vec![1; size.len()];
        match T::read_into(&self.file, &mut value, name, &counts) {
            Ok(()) => {
                info!(option = name, value = %value[0], source = %self.path.display(), "Read option");
                Ok(Some(value[0]))
            }
            Err(e) => {
                warn!(option = name, error = %e, "Could not read option");
                Ok(None)
            }
        }
    }

    /// Read `len` integers starting at `offset` along the first axis.
    pub fn get_int_vector(&mut self, name: &str, len: usize, offset: usize) -> Option<Vec<i32>> {
        self.get_vector(name, len, offset)
    }

    /// Read `len` reals starting at `offset` along the first axis.
    pub fn get_real_vector(&mut self, name: &str, len: usize, offset: usize) -> Option<Vec<f64>> {
        self.get_vector(name, len, offset)
    }

    /// Read `len` values starting at `offset` along the first axis.
    ///
    /// `None` if the file is unusable or the read fails.
    #[instrument(level = "debug", skip(self), fields(file = %self.path.display()))]
    pub fn get_vector<T: DataValue>(&mut self, name: &str, len: usize, offset: usize) -> Option<Vec<T>> {
        if !self.file.is_valid() {
            return None;
        }

        let rank = self.file.size(name).len().max(1);
        let mut counts = vec![1; rank];
        counts[0] = len;

        let mut values = vec![T::default(); len];
        let cursor = OriginGuard::new(&mut self.file, &[offset]);
        match T::read_into(&*cursor, &mut values, name, &counts) {
            Ok(()) => Some(values),
            Err(e) => {
                debug!(name, len, offset, error = %e, "Vector read failed");
                None
            }
        }
    }

    /// Whether the file stores x boundary guard cells.
    ///
    /// Decided from the spacing variable (`dx`) that every standard grid file
    /// carries, not from any particular field. False if it is absent.
    pub fn has_x_boundary_guards<P: PartitionLayout + ?Sized>(&self, partition: &P) -> bool {
        let dims = self.file.size(&self.config.variables.spacing);
        match dims.first() {
            Some(&file_nx) => {
                file_nx > partition.global_nx().saturating_sub(2 * partition.xstart())
            }
            None => false,
        }
    }

    pub(crate) fn ensure_readable(&self) -> Result<()> {
        if self.file.is_valid() {
            Ok(())
        } else {
            Err(GridLoaderError::file_unreadable(self.path.display().to_string()))
        }
    }
}

impl<F: DataFormat> Drop for GridFile<F> {
    fn drop(&mut self) {
        self.file.close();
    }
}

/// Read a non-negative count stored as a scalar; absent or unreadable is 0.
fn read_optional_count<F: DataFormat>(format: &F, name: &str) -> usize {
    let size = format.size(name);
    if size.is_empty() {
        return 0;
    }

    let mut value = [0i32];
    let counts = vec![1; size.len()];
    match format.read_i32(&mut value, name, &counts) {
        Ok(()) => usize::try_from(value[0]).unwrap_or_else(|_| {
            warn!(name, value = value[0], "Negative count in grid file, using 0");
            0
        }),
        Err(e) => {
            debug!(name, error = %e, "Optional count not readable, using 0");
            0
        }
    }
}
