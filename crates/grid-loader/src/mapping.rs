//! Mapping between a variable's extents in the file and a partition's local array.
//!
//! Two padding conventions are accepted on each axis:
//!
//! - the file stores boundary guard cells (x: detected from the extent,
//!   y: announced by `y_boundary_guards`), and the partition's ghost cells
//!   are read straight from the file
//! - the file stores only the interior, and the partition's ghost cells are
//!   filled afterwards by edge replication

use mesh_common::PartitionLayout;
use tracing::debug;

use crate::error::{GridLoaderError, Result};

/// Read window on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    /// First global index to read from the file.
    pub read_start: usize,
    /// First local index to write into.
    pub write_start: usize,
    /// Number of points to read.
    pub read_len: usize,
    /// Whether the file stores boundary guard cells on this axis.
    pub file_has_guards: bool,
}

/// Read windows on both axes of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexMapping {
    pub x: AxisMapping,
    pub y: AxisMapping,
}

/// Ghost cell width on one side of an axis: `(local - interior) / 2`.
pub fn ghost_width(axis: char, local: usize, interior: usize) -> Result<usize> {
    let uneven = || GridLoaderError::UnevenGhostCells {
        axis,
        local,
        interior,
    };
    let extra = local.checked_sub(interior).ok_or_else(uneven)?;
    if extra % 2 != 0 {
        return Err(uneven());
    }
    Ok(extra / 2)
}

/// Local points left once `guards` ghost cells are taken off each side.
fn interior_len(axis: char, local: usize, guards: usize) -> Result<usize> {
    local
        .checked_sub(2 * guards)
        .ok_or(GridLoaderError::UnevenGhostCells {
            axis,
            local,
            interior: 0,
        })
}

/// Map the x axis from the variable's extent in the file.
///
/// `global_nx` includes `2 * mxg` ghost cells, so the global interior is
/// `global_nx - 2 * mxg`. The file's guard count is whatever is left over.
pub(crate) fn map_x_axis(
    name: &str,
    file_nx: usize,
    global_nx: usize,
    mxg: usize,
    local_nx: usize,
    offset_x: usize,
) -> Result<AxisMapping> {
    let convention = || GridLoaderError::XGuardConvention {
        name: name.to_string(),
        file_nx,
        interior_nx: global_nx.saturating_sub(2 * mxg),
    };

    let interior_nx = global_nx.checked_sub(2 * mxg).ok_or_else(convention)?;
    let extra = file_nx.checked_sub(interior_nx).ok_or_else(convention)?;
    if extra % 2 != 0 {
        return Err(convention());
    }
    let grid_xguards = extra / 2;

    if grid_xguards == 0 {
        // Interior only
        Ok(AxisMapping {
            read_start: offset_x,
            write_start: mxg,
            read_len: interior_len('x', local_nx, mxg)?,
            file_has_guards: false,
        })
    } else if grid_xguards >= mxg {
        let write_start = grid_xguards - mxg;
        Ok(AxisMapping {
            read_start: offset_x,
            write_start,
            read_len: local_nx.saturating_sub(write_start),
            file_has_guards: true,
        })
    } else {
        Err(GridLoaderError::TooFewGuardCells {
            name: name.to_string(),
            axis: 'x',
            file_guards: grid_xguards,
            local_guards: mxg,
        })
    }
}

/// Map the y axis from the file's stored `y_boundary_guards` count.
///
/// With two target regions the file holds an extra `2 * grid_yguards` rows
/// between them; partitions starting at or after `ny_inner` skip over them.
#[allow(clippy::too_many_arguments)]
pub(crate) fn map_y_axis(
    name: &str,
    file_ny: usize,
    global_ny: usize,
    myg: usize,
    local_ny: usize,
    offset_y: usize,
    grid_yguards: usize,
    ny_inner: usize,
    target_count: usize,
) -> Result<AxisMapping> {
    if !(1..=2).contains(&target_count) {
        return Err(GridLoaderError::UnsupportedTargets(target_count));
    }

    let interior_ny = global_ny.saturating_sub(2 * myg);
    let expected_ny = interior_ny + 2 * grid_yguards * target_count;
    if file_ny != expected_ny {
        return Err(GridLoaderError::YGuardConvention {
            name: name.to_string(),
            file_ny,
            expected_ny,
            grid_yguards,
        });
    }

    let mut read_start = offset_y;
    if target_count == 2 && offset_y >= ny_inner {
        // Neither ny_inner nor offset_y count guard cells
        read_start += 2 * grid_yguards;
    }

    if grid_yguards == 0 {
        Ok(AxisMapping {
            read_start,
            write_start: myg,
            read_len: interior_len('y', local_ny, myg)?,
            file_has_guards: false,
        })
    } else if grid_yguards >= myg {
        let write_start = grid_yguards - myg;
        Ok(AxisMapping {
            read_start,
            write_start,
            read_len: local_ny.saturating_sub(write_start),
            file_has_guards: true,
        })
    } else {
        Err(GridLoaderError::TooFewGuardCells {
            name: name.to_string(),
            axis: 'y',
            file_guards: grid_yguards,
            local_guards: myg,
        })
    }
}

/// Compute the full mapping for a variable with leading extents `dims[0..2]`.
pub fn map_field<P: PartitionLayout + ?Sized>(
    partition: &P,
    name: &str,
    dims: &[usize],
    grid_yguards: usize,
    ny_inner: usize,
) -> Result<IndexMapping> {
    let mxg = ghost_width('x', partition.local_nx(), partition.interior_nx())?;
    let myg = ghost_width('y', partition.local_ny(), partition.interior_ny())?;

    let x = map_x_axis(
        name,
        dims[0],
        partition.global_nx(),
        mxg,
        partition.local_nx(),
        partition.offset_x(),
    )?;
    let y = map_y_axis(
        name,
        dims[1],
        partition.global_ny(),
        myg,
        partition.local_ny(),
        partition.offset_y(),
        grid_yguards,
        ny_inner,
        partition.target_count(),
    )?;

    debug!(name, ?x, ?y, "Mapped file extents to partition");
    Ok(IndexMapping { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::Partition;

    #[test]
    fn test_ghost_width() {
        assert_eq!(ghost_width('x', 34, 30).unwrap(), 2);
        assert_eq!(ghost_width('x', 30, 30).unwrap(), 0);
        assert!(matches!(
            ghost_width('y', 33, 30),
            Err(GridLoaderError::UnevenGhostCells { axis: 'y', .. })
        ));
        assert!(ghost_width('y', 28, 30).is_err());
    }

    #[test]
    fn test_write_offset_is_disk_minus_local() {
        for local in 0..4 {
            for disk in local.max(1)..6 {
                let interior = 30;
                let m = map_x_axis("f", interior + 2 * disk, interior + 2 * local, local, 10 + 2 * local, 0)
                    .unwrap();
                assert_eq!(m.write_start, disk - local);
                assert!(m.file_has_guards);
                assert!(m.write_start + m.read_len <= 10 + 2 * local);
            }
        }
    }

    #[test]
    fn test_too_few_file_guards_is_fatal() {
        let err = map_x_axis("f", 32, 34, 2, 34, 0).unwrap_err();
        assert!(matches!(
            err,
            GridLoaderError::TooFewGuardCells { axis: 'x', file_guards: 1, local_guards: 2, .. }
        ));
    }

    #[test]
    fn test_interior_only_x() {
        let m = map_x_axis("f", 30, 34, 2, 19, 15).unwrap();
        assert_eq!(
            m,
            AxisMapping { read_start: 15, write_start: 2, read_len: 15, file_has_guards: false }
        );
    }

    #[test]
    fn test_interior_only_narrower_than_ghosts() {
        assert!(matches!(
            map_x_axis("f", 30, 34, 2, 3, 0),
            Err(GridLoaderError::UnevenGhostCells { axis: 'x', local: 3, .. })
        ));
        assert!(matches!(
            map_y_axis("f", 20, 24, 2, 1, 0, 0, 0, 1),
            Err(GridLoaderError::UnevenGhostCells { axis: 'y', local: 1, .. })
        ));
    }

    #[test]
    fn test_odd_or_short_x_extent_is_fatal() {
        assert!(matches!(
            map_x_axis("f", 31, 34, 2, 34, 0),
            Err(GridLoaderError::XGuardConvention { .. })
        ));
        assert!(matches!(
            map_x_axis("f", 28, 34, 2, 34, 0),
            Err(GridLoaderError::XGuardConvention { .. })
        ));
    }

    #[test]
    fn test_y_with_guards_single_target() {
        let m = map_y_axis("f", 24, 24, 2, 12, 10, 2, 0, 1).unwrap();
        assert_eq!(
            m,
            AxisMapping { read_start: 10, write_start: 0, read_len: 12, file_has_guards: true }
        );
    }

    #[test]
    fn test_y_split_targets_shift_after_ny_inner() {
        // 20 interior rows, 2 guards per target boundary, split at 10
        let lower = map_y_axis("f", 28, 24, 2, 9, 5, 2, 10, 2).unwrap();
        let upper = map_y_axis("f", 28, 24, 2, 9, 10, 2, 10, 2).unwrap();
        assert_eq!(lower.read_start, 5);
        assert_eq!(upper.read_start, 14);
    }

    #[test]
    fn test_y_extent_mismatch_is_fatal() {
        let err = map_y_axis("f", 22, 24, 2, 24, 0, 0, 0, 1).unwrap_err();
        assert!(matches!(err, GridLoaderError::YGuardConvention { expected_ny: 20, .. }));
    }

    #[test]
    fn test_more_than_two_targets_rejected() {
        let err = map_y_axis("f", 20, 24, 2, 24, 0, 0, 0, 3).unwrap_err();
        assert!(matches!(err, GridLoaderError::UnsupportedTargets(3)));
    }

    #[test]
    fn test_map_field_serial() {
        let p = Partition::serial(30, 20, 1, 2, 2);
        let m = map_field(&p, "f", &[34, 20], 0, 0).unwrap();
        assert_eq!(m.x.write_start, 0);
        assert_eq!(m.x.read_len, 34);
        assert!(m.x.file_has_guards);
        assert_eq!(m.y.write_start, 2);
        assert_eq!(m.y.read_len, 20);
        assert!(!m.y.file_has_guards);
    }
}
