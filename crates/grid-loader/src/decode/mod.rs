//! Decoders for the z dimension of 3-D variables.
//!
//! - [`read_direct`]: z stored sample by sample
//! - [`read_spectral`]: z stored as a truncated Fourier series per (x, y)

mod direct;
mod spectral;

pub use direct::read_direct;
pub use spectral::{read_spectral, ModeSelection};

use crate::mapping::IndexMapping;

/// Region of the file to read and where it lands in the local array.
///
/// Offsets are unsigned and come only from an [`IndexMapping`], so a window
/// with negative starts cannot be built. [`ReadWindow::fits`] guards the
/// write side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadWindow {
    pub x_read: usize,
    pub x_write: usize,
    pub x_count: usize,
    pub y_read: usize,
    pub y_write: usize,
    pub y_count: usize,
}

impl ReadWindow {
    pub fn from_mapping(mapping: &IndexMapping) -> Self {
        Self {
            x_read: mapping.x.read_start,
            x_write: mapping.x.write_start,
            x_count: mapping.x.read_len,
            y_read: mapping.y.read_start,
            y_write: mapping.y.write_start,
            y_count: mapping.y.read_len,
        }
    }

    /// Whether the write side of the window lies inside an `nx` x `ny` array.
    pub fn fits(&self, nx: usize, ny: usize) -> bool {
        self.x_write + self.x_count <= nx && self.y_write + self.y_count <= ny
    }

    /// Global (x, y) file positions paired with local (x, y) destinations.
    pub(crate) fn points(&self) -> impl Iterator<Item = ((usize, usize), (usize, usize))> + '_ {
        (0..self.x_count).flat_map(move |i| {
            (0..self.y_count).map(move |j| {
                (
                    (self.x_read + i, self.y_read + j),
                    (self.x_write + i, self.y_write + j),
                )
            })
        })
    }
}
