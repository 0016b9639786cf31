//! Dense local field storage.
//!
//! Both containers are x-major: for a [`Field2D`] the y values of one x
//! column are contiguous, for a [`Field3D`] the z values of one (x, y) point
//! are contiguous. Loaders rely on this to read whole runs in one call.

use crate::location::CellLocation;
use crate::partition::PartitionLayout;
use std::ops::{Index, IndexMut};

/// Three-index access shared by 2-D and 3-D fields.
///
/// A [`Field2D`] reports `nz == 1` and ignores the z index.
pub trait FieldBuffer {
    /// `(nx, ny, nz)` of the local array.
    fn shape(&self) -> (usize, usize, usize);

    fn location(&self) -> CellLocation;

    fn value(&self, x: usize, y: usize, z: usize) -> f64;

    fn set_value(&mut self, x: usize, y: usize, z: usize, value: f64);

    /// Set every element to `value`.
    fn fill(&mut self, value: f64);
}

/// A field with no z dependence.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    nx: usize,
    ny: usize,
    location: CellLocation,
    data: Vec<f64>,
}

impl Field2D {
    /// Zero-initialised `nx` x `ny` field at the cell centre.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            location: CellLocation::Centre,
            data: vec![0.0; nx * ny],
        }
    }

    /// Zero-initialised field covering the local array of `partition`.
    pub fn for_partition<P: PartitionLayout + ?Sized>(partition: &P) -> Self {
        Self::new(partition.local_nx(), partition.local_ny())
    }

    pub fn with_location(mut self, location: CellLocation) -> Self {
        self.location = location;
        self
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Make sure storage matches the declared shape and clear it.
    pub fn allocate(&mut self) {
        self.data.clear();
        self.data.resize(self.nx * self.ny, 0.0);
    }

    /// The contiguous y values of column `x`.
    pub fn column(&self, x: usize) -> &[f64] {
        &self.data[x * self.ny..(x + 1) * self.ny]
    }

    pub fn column_mut(&mut self, x: usize) -> &mut [f64] {
        &mut self.data[x * self.ny..(x + 1) * self.ny]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for Field2D {
    type Output = f64;

    fn index(&self, (x, y): (usize, usize)) -> &f64 {
        &self.data[x * self.ny + y]
    }
}

impl IndexMut<(usize, usize)> for Field2D {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f64 {
        &mut self.data[x * self.ny + y]
    }
}

impl FieldBuffer for Field2D {
    fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, 1)
    }

    fn location(&self) -> CellLocation {
        self.location
    }

    fn value(&self, x: usize, y: usize, _z: usize) -> f64 {
        self[(x, y)]
    }

    fn set_value(&mut self, x: usize, y: usize, _z: usize, value: f64) {
        self[(x, y)] = value;
    }

    fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }
}

/// A field over the full local (x, y, z) array.
#[derive(Debug, Clone, PartialEq)]
pub struct Field3D {
    nx: usize,
    ny: usize,
    nz: usize,
    location: CellLocation,
    data: Vec<f64>,
}

impl Field3D {
    /// Zero-initialised `nx` x `ny` x `nz` field at the cell centre.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            nx,
            ny,
            nz,
            location: CellLocation::Centre,
            data: vec![0.0; nx * ny * nz],
        }
    }

    /// Zero-initialised field covering the local array of `partition`.
    pub fn for_partition<P: PartitionLayout + ?Sized>(partition: &P) -> Self {
        Self::new(
            partition.local_nx(),
            partition.local_ny(),
            partition.local_nz(),
        )
    }

    pub fn with_location(mut self, location: CellLocation) -> Self {
        self.location = location;
        self
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    /// Make sure storage matches the declared shape and clear it.
    pub fn allocate(&mut self) {
        self.data.clear();
        self.data.resize(self.nx * self.ny * self.nz, 0.0);
    }

    /// The contiguous z values at point (x, y).
    pub fn point(&self, x: usize, y: usize) -> &[f64] {
        let start = (x * self.ny + y) * self.nz;
        &self.data[start..start + self.nz]
    }

    pub fn point_mut(&mut self, x: usize, y: usize) -> &mut [f64] {
        let start = (x * self.ny + y) * self.nz;
        &mut self.data[start..start + self.nz]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize, usize)> for Field3D {
    type Output = f64;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &f64 {
        &self.data[(x * self.ny + y) * self.nz + z]
    }
}

impl IndexMut<(usize, usize, usize)> for Field3D {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut f64 {
        &mut self.data[(x * self.ny + y) * self.nz + z]
    }
}

impl FieldBuffer for Field3D {
    fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    fn location(&self) -> CellLocation {
        self.location
    }

    fn value(&self, x: usize, y: usize, z: usize) -> f64 {
        self[(x, y, z)]
    }

    fn set_value(&mut self, x: usize, y: usize, z: usize, value: f64) {
        self[(x, y, z)] = value;
    }

    fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }
}
