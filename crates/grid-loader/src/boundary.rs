//! Edge replication into ghost cells the file did not provide.

use mesh_common::FieldBuffer;

/// Copy column `xstart` into every column before it and column `xend` into
/// every column after it, for all y and z.
pub fn replicate_x_boundaries<F: FieldBuffer + ?Sized>(field: &mut F, xstart: usize, xend: usize) {
    let (nx, ny, nz) = field.shape();
    if xstart > xend || xend >= nx {
        return;
    }

    for x in (0..xstart).chain(xend + 1..nx) {
        let source = if x < xstart { xstart } else { xend };
        for y in 0..ny {
            for z in 0..nz {
                let value = field.value(source, y, z);
                field.set_value(x, y, z, value);
            }
        }
    }
}

/// Copy row `ystart` into every row below it and row `yend` into every row
/// above it, for all x and z.
pub fn replicate_y_boundaries<F: FieldBuffer + ?Sized>(field: &mut F, ystart: usize, yend: usize) {
    let (nx, ny, nz) = field.shape();
    if ystart > yend || yend >= ny {
        return;
    }

    for x in 0..nx {
        for y in (0..ystart).chain(yend + 1..ny) {
            let source = if y < ystart { ystart } else { yend };
            for z in 0..nz {
                let value = field.value(x, source, z);
                field.set_value(x, y, z, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_common::{Field2D, Field3D};

    fn ramp3d(nx: usize, ny: usize, nz: usize) -> Field3D {
        let mut f = Field3D::new(nx, ny, nz);
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    f[(x, y, z)] = (100 * x + 10 * y + z) as f64;
                }
            }
        }
        f
    }

    #[test]
    fn test_x_replication_copies_edges() {
        let mut f = ramp3d(6, 3, 2);
        replicate_x_boundaries(&mut f, 2, 3);
        for y in 0..3 {
            for z in 0..2 {
                assert_eq!(f[(0, y, z)], f[(2, y, z)]);
                assert_eq!(f[(1, y, z)], f[(2, y, z)]);
                assert_eq!(f[(4, y, z)], f[(3, y, z)]);
                assert_eq!(f[(5, y, z)], (300 + 10 * y + z) as f64);
            }
        }
    }

    #[test]
    fn test_y_replication_2d() {
        let mut f = Field2D::new(2, 5);
        for x in 0..2 {
            for y in 0..5 {
                f[(x, y)] = (10 * x + y) as f64;
            }
        }
        replicate_y_boundaries(&mut f, 1, 3);
        assert_eq!(f.column(0), &[1.0, 1.0, 2.0, 3.0, 3.0]);
        assert_eq!(f.column(1), &[11.0, 11.0, 12.0, 13.0, 13.0]);
    }

    #[test]
    fn test_replication_is_idempotent() {
        let mut once = ramp3d(7, 6, 3);
        replicate_x_boundaries(&mut once, 2, 4);
        replicate_y_boundaries(&mut once, 1, 4);

        let mut twice = once.clone();
        replicate_x_boundaries(&mut twice, 2, 4);
        replicate_y_boundaries(&mut twice, 1, 4);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_ghosts_is_noop() {
        let mut f = ramp3d(3, 3, 1);
        let before = f.clone();
        replicate_x_boundaries(&mut f, 0, 2);
        replicate_y_boundaries(&mut f, 0, 2);
        assert_eq!(f, before);
    }
}
