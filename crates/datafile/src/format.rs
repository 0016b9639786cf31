//! The file accessor contract and its scoped cursor.

use std::fmt;
use std::ops::{Deref, DerefMut, Range};
use std::path::Path;

use crate::error::{FormatError, FormatResult};

/// Read access to a file of named, multi-dimensional variables.
///
/// Reads are hyperslabs: `counts[i]` elements along axis `i`, starting at
/// the accessor's current *origin* (missing origin components are 0).
/// The origin is per-handle state; prefer [`OriginGuard`] over calling
/// [`set_origin`](DataFormat::set_origin) directly so it is always restored.
pub trait DataFormat {
    /// Open `path` for reading, replacing any file already open.
    fn open_read(&mut self, path: &Path) -> FormatResult<()>;

    /// Close the file. Closing a closed accessor is a no-op.
    fn close(&mut self);

    /// Whether a file is open and readable.
    fn is_valid(&self) -> bool;

    /// Extents of variable `name`, or an empty vector if it does not exist.
    ///
    /// Scalar variables report `[1]`.
    fn size(&self, name: &str) -> Vec<usize>;

    /// Read a hyperslab of `name` into `dest`, converting to f64.
    fn read_f64(&self, dest: &mut [f64], name: &str, counts: &[usize]) -> FormatResult<()>;

    /// Read a hyperslab of `name` into `dest`, converting to i32.
    fn read_i32(&self, dest: &mut [i32], name: &str, counts: &[usize]) -> FormatResult<()>;

    /// Current read origin.
    fn origin(&self) -> &[usize];

    /// Move the read origin. An empty slice resets it to the start of every axis.
    fn set_origin(&mut self, origin: &[usize]);

    /// A file-level text attribute.
    fn global_attribute(&self, name: &str) -> Option<String>;
}

impl<F: DataFormat + ?Sized> DataFormat for Box<F> {
    fn open_read(&mut self, path: &Path) -> FormatResult<()> {
        (**self).open_read(path)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn size(&self, name: &str) -> Vec<usize> {
        (**self).size(name)
    }

    fn read_f64(&self, dest: &mut [f64], name: &str, counts: &[usize]) -> FormatResult<()> {
        (**self).read_f64(dest, name, counts)
    }

    fn read_i32(&self, dest: &mut [i32], name: &str, counts: &[usize]) -> FormatResult<()> {
        (**self).read_i32(dest, name, counts)
    }

    fn origin(&self) -> &[usize] {
        (**self).origin()
    }

    fn set_origin(&mut self, origin: &[usize]) {
        (**self).set_origin(origin)
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        (**self).global_attribute(name)
    }
}

/// Values that can be read from a [`DataFormat`].
pub trait DataValue: Copy + Default + fmt::Display + 'static {
    fn read_into<F: DataFormat + ?Sized>(
        format: &F,
        dest: &mut [Self],
        name: &str,
        counts: &[usize],
    ) -> FormatResult<()>;
}

impl DataValue for f64 {
    fn read_into<F: DataFormat + ?Sized>(
        format: &F,
        dest: &mut [Self],
        name: &str,
        counts: &[usize],
    ) -> FormatResult<()> {
        format.read_f64(dest, name, counts)
    }
}

impl DataValue for i32 {
    fn read_into<F: DataFormat + ?Sized>(
        format: &F,
        dest: &mut [Self],
        name: &str,
        counts: &[usize],
    ) -> FormatResult<()> {
        format.read_i32(dest, name, counts)
    }
}

/// Moves a format's origin for the lifetime of the guard.
///
/// The previous origin is restored on drop, including on early returns.
///
/// ```ignore
/// let cursor = OriginGuard::new(&mut format, &[x, y]);
/// cursor.read_f64(&mut buf, "T", &[1, 1, nz])?;
/// // origin restored here
/// ```
pub struct OriginGuard<'a, F: DataFormat + ?Sized> {
    format: &'a mut F,
    previous: Vec<usize>,
}

impl<'a, F: DataFormat + ?Sized> OriginGuard<'a, F> {
    pub fn new(format: &'a mut F, origin: &[usize]) -> Self {
        let previous = format.origin().to_vec();
        format.set_origin(origin);
        Self { format, previous }
    }

    /// Move the origin again without giving up the guard.
    pub fn reposition(&mut self, origin: &[usize]) {
        self.format.set_origin(origin);
    }
}

impl<F: DataFormat + ?Sized> Deref for OriginGuard<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.format
    }
}

impl<F: DataFormat + ?Sized> DerefMut for OriginGuard<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.format
    }
}

impl<F: DataFormat + ?Sized> Drop for OriginGuard<'_, F> {
    fn drop(&mut self) {
        self.format.set_origin(&self.previous);
    }
}

/// Per-axis index ranges of the hyperslab `origin + [0, counts)` in a
/// variable of extents `shape`, checked against the extents.
///
/// Origin components beyond the rank are ignored; missing ones are 0.
pub fn hyperslab_ranges(
    name: &str,
    shape: &[usize],
    origin: &[usize],
    counts: &[usize],
) -> FormatResult<Vec<Range<usize>>> {
    if counts.len() != shape.len() {
        return Err(FormatError::shape_mismatch(
            name,
            format!("{} counts for a rank {} variable", counts.len(), shape.len()),
        ));
    }

    let mut ranges = Vec::with_capacity(shape.len());
    for (axis, (&extent, &count)) in shape.iter().zip(counts).enumerate() {
        let start = origin.get(axis).copied().unwrap_or(0);
        if start + count > extent {
            return Err(FormatError::OutOfBounds {
                name: name.to_string(),
                axis,
                origin: start,
                count,
                extent,
            });
        }
        ranges.push(start..start + count);
    }
    Ok(ranges)
}

/// Flat row-major indices of the hyperslab `origin + [0, counts)` in a
/// variable of extents `shape`.
pub fn hyperslab_indices(
    name: &str,
    shape: &[usize],
    origin: &[usize],
    counts: &[usize],
) -> FormatResult<Vec<usize>> {
    let start: Vec<usize> = hyperslab_ranges(name, shape, origin, counts)?
        .into_iter()
        .map(|r| r.start)
        .collect();

    let total: usize = counts.iter().product();
    if total == 0 {
        return Ok(Vec::new());
    }

    // Row-major strides
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }

    let mut indices = Vec::with_capacity(total);
    let mut position = vec![0usize; shape.len()];
    for _ in 0..total {
        let flat = position
            .iter()
            .zip(&start)
            .zip(&strides)
            .map(|((p, s), stride)| (p + s) * stride)
            .sum();
        indices.push(flat);

        // Advance the odometer, last axis fastest
        for axis in (0..shape.len()).rev() {
            position[axis] += 1;
            if position[axis] < counts[axis] {
                break;
            }
            position[axis] = 0;
        }
    }

    Ok(indices)
}
