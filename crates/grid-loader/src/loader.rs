//! Loading partition-local fields from a grid file.

use datafile::{DataFormat, OriginGuard};
use mesh_common::{CellLocation, Field2D, Field3D, FieldBuffer, PartitionLayout};
use tracing::{debug, instrument, warn};

use crate::boundary::{replicate_x_boundaries, replicate_y_boundaries};
use crate::decode::{read_direct, read_spectral, ReadWindow};
use crate::error::{GridLoaderError, Result};
use crate::gridfile::GridFile;
use crate::mapping::{map_field, IndexMapping};

/// Where the values of a loaded field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Read from a 2-D or 3-D variable.
    File,
    /// A single stored value broadcast over the field.
    Scalar,
    /// Variable absent or of unusable rank; filled with the default.
    Default,
}

/// A loaded field and how it was filled.
#[derive(Debug, Clone)]
pub struct FieldRead<T> {
    pub field: T,
    pub source: FieldSource,
}

impl<T> FieldRead<T> {
    /// Whether the values came from the file.
    pub fn found(&self) -> bool {
        self.source != FieldSource::Default
    }

    pub fn into_field(self) -> T {
        self.field
    }
}

/// Outcome of checking a variable's rank against the destination.
enum Shape {
    Absent,
    Scalar,
    Plane(Vec<usize>),
    Volume(Vec<usize>),
    Unusable,
}

fn classify(name: &str, dims: Vec<usize>, volume_allowed: bool) -> Result<Shape> {
    match dims.len() {
        0 => Ok(Shape::Absent),
        1 if dims[0] == 1 => Ok(Shape::Scalar),
        1 => Err(GridLoaderError::NotTwoDimensional {
            name: name.to_string(),
            len: dims[0],
        }),
        2 => Ok(Shape::Plane(dims)),
        3 if volume_allowed => Ok(Shape::Volume(dims)),
        3 => {
            warn!(name, "Variable should be 2D, but has 3 dimensions. Ignored");
            Ok(Shape::Unusable)
        }
        n => {
            warn!(name, dims = n, "Variable has too many dimensions. Ignored");
            Ok(Shape::Unusable)
        }
    }
}

impl<F: DataFormat> GridFile<F> {
    /// Load a 2-D field for `partition`.
    ///
    /// An absent variable, or one of rank 3 or more, fills the field with
    /// `default` and reports [`FieldSource::Default`].
    #[instrument(skip(self, partition), fields(file = %self.path.display()))]
    pub fn load_field_2d<P: PartitionLayout + ?Sized>(
        &mut self,
        partition: &P,
        name: &str,
        default: f64,
    ) -> Result<FieldRead<Field2D>> {
        self.ensure_readable()?;

        let mut field = Field2D::for_partition(partition);
        let dims = self.file.size(name);
        let dims = match classify(name, dims, false)? {
            Shape::Plane(dims) => dims,
            Shape::Scalar => {
                let value = self.read_scalar(name)?;
                field.fill(value);
                return Ok(FieldRead { field, source: FieldSource::Scalar });
            }
            Shape::Absent => return Ok(self.defaulted(name, field, default)),
            Shape::Volume(_) | Shape::Unusable => {
                field.fill(default);
                return Ok(FieldRead { field, source: FieldSource::Default });
            }
        };

        field.allocate();
        let mapping = map_field(partition, name, &dims, self.y_boundary_guards, self.ny_inner)?;
        read_columns(&mut self.file, name, &mapping, &mut field)?;
        self.replicate(partition, &mapping, &mut field);

        Ok(FieldRead { field, source: FieldSource::File })
    }

    /// Load a 3-D field at the cell centre.
    pub fn load_field_3d<P: PartitionLayout + ?Sized>(
        &mut self,
        partition: &P,
        name: &str,
        default: f64,
    ) -> Result<FieldRead<Field3D>> {
        self.load_field_3d_at(partition, name, default, CellLocation::Centre)
    }

    /// Load a 3-D field at `location`.
    ///
    /// A 2-D variable is broadcast along z. A 3-D variable is decoded sample
    /// by sample when the file has an `nz` variable and from Fourier modes
    /// otherwise.
    #[instrument(skip(self, partition), fields(file = %self.path.display()))]
    pub fn load_field_3d_at<P: PartitionLayout + ?Sized>(
        &mut self,
        partition: &P,
        name: &str,
        default: f64,
        location: CellLocation,
    ) -> Result<FieldRead<Field3D>> {
        self.ensure_readable()?;

        let mut field = Field3D::for_partition(partition).with_location(location);
        let dims = self.file.size(name);
        let shape = classify(name, dims, true)?;
        let dims = match shape {
            Shape::Plane(ref dims) | Shape::Volume(ref dims) => dims.clone(),
            Shape::Scalar => {
                let value = self.read_scalar(name)?;
                field.fill(value);
                return Ok(FieldRead { field, source: FieldSource::Scalar });
            }
            Shape::Absent => return Ok(self.defaulted(name, field, default)),
            Shape::Unusable => {
                field.fill(default);
                return Ok(FieldRead { field, source: FieldSource::Default });
            }
        };

        if dims.len() == 3 && dims[2] == 1 && field.nz() > 1 {
            warn!(
                name,
                nz = field.nz(),
                "Variable is 3D with a single z point, but the field has more. Ignored"
            );
            field.fill(default);
            return Ok(FieldRead { field, source: FieldSource::Default });
        }

        field.allocate();
        let mapping = map_field(partition, name, &dims, self.y_boundary_guards, self.ny_inner)?;

        if dims.len() == 2 {
            let mut plane = Field2D::for_partition(partition);
            read_columns(&mut self.file, name, &mapping, &mut plane)?;
            broadcast_along_z(&plane, &mut field);
        } else {
            let window = ReadWindow::from_mapping(&mapping);
            let decoded = if self.has_var(&self.config.variables.nz) {
                if dims[2] != field.nz() {
                    return Err(GridLoaderError::NzMismatch {
                        name: name.to_string(),
                        found: dims[2],
                        expected: field.nz(),
                    });
                }
                debug!(name, "Reading z samples directly");
                read_direct(&mut self.file, name, &window, &mut field)
            } else {
                debug!(name, "Reading z as Fourier modes");
                read_spectral(&mut self.file, partition, name, &window, &mut field)?
            };
            if !decoded {
                return Err(GridLoaderError::decode_failed(name));
            }
        }

        self.replicate(partition, &mapping, &mut field);

        Ok(FieldRead { field, source: FieldSource::File })
    }

    fn read_scalar(&self, name: &str) -> Result<f64> {
        let mut value = [0.0];
        self.file
            .read_f64(&mut value, name, &[1])
            .map_err(|source| GridLoaderError::ScalarReadFailed {
                name: name.to_string(),
                source,
            })?;
        debug!(name, value = value[0], "Broadcasting scalar over field");
        Ok(value[0])
    }

    fn defaulted<T: FieldBuffer>(&self, name: &str, mut field: T, default: f64) -> FieldRead<T> {
        warn!(
            name,
            default,
            file = %self.path.display(),
            "Variable not found in grid file. Setting to default"
        );
        field.fill(default);
        FieldRead { field, source: FieldSource::Default }
    }

    /// Fill ghost cells the file did not provide from the nearest interior edge.
    fn replicate<P, T>(&self, partition: &P, mapping: &IndexMapping, field: &mut T)
    where
        P: PartitionLayout + ?Sized,
        T: FieldBuffer,
    {
        if !mapping.x.file_has_guards {
            replicate_x_boundaries(field, partition.xstart(), partition.xend());
        }
        if self.y_boundary_guards == 0 {
            replicate_y_boundaries(field, partition.ystart(), partition.yend());
        }
    }
}

/// Read one contiguous y run per x column.
fn read_columns<F: DataFormat + ?Sized>(
    format: &mut F,
    name: &str,
    mapping: &IndexMapping,
    field: &mut Field2D,
) -> Result<()> {
    if !ReadWindow::from_mapping(mapping).fits(field.nx(), field.ny()) {
        warn!(name, ?mapping, "Read window does not fit the destination");
        return Err(GridLoaderError::decode_failed(name));
    }

    let (x, y) = (mapping.x, mapping.y);
    let mut cursor = OriginGuard::new(format, &[]);
    for i in 0..x.read_len {
        cursor.reposition(&[x.read_start + i, y.read_start]);
        let column = &mut field.column_mut(x.write_start + i)[y.write_start..y.write_start + y.read_len];
        cursor
            .read_f64(column, name, &[1, y.read_len])
            .map_err(|source| GridLoaderError::ColumnReadFailed {
                name: name.to_string(),
                source,
            })?;
    }
    Ok(())
}

fn broadcast_along_z(plane: &Field2D, field: &mut Field3D) {
    for x in 0..field.nx() {
        for y in 0..field.ny() {
            let value = plane[(x, y)];
            field.point_mut(x, y).iter_mut().for_each(|v| *v = value);
        }
    }
}
