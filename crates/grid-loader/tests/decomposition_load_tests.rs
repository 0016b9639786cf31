//! Every rank of a decomposition reads exactly its own block of a global
//! index pattern.

use datafile::{MemoryDataset, MemoryFormat};
use grid_loader::GridFile;
use mesh_common::PartitionLayout;
use test_utils::{global_index_dataset, index_plane, index_value_2d, index_value_3d, mesh, vars};

#[test]
fn test_each_rank_reads_its_global_block() {
    let config = mesh::six_ranks();
    // 2 x guards and 2 y guards stored in the file
    let (file_nx, file_ny) = (config.nx + 4, config.ny + 4);
    let dataset = global_index_dataset(file_nx, file_ny, config.nz)
        .with_scalar_int(vars::Y_BOUNDARY_GUARDS, 2);

    for rank in 0..config.num_ranks() {
        let p = config.partition(rank).unwrap();
        let mut grid = GridFile::open(MemoryFormat::from_dataset(dataset.clone()), "grid.nc").unwrap();

        let f2 = grid.load_field_2d(&p, "f2d", -1.0).unwrap();
        assert!(f2.found());
        let f3 = grid.load_field_3d(&p, "f3d", -1.0).unwrap();
        assert!(f3.found());

        for lx in 0..p.local_nx() {
            for ly in 0..p.local_ny() {
                let (gx, gy) = (p.offset_x() + lx, p.offset_y() + ly);
                assert_eq!(
                    f2.field[(lx, ly)],
                    index_value_2d(file_ny, gx, gy),
                    "rank {} local ({}, {})",
                    rank,
                    lx,
                    ly
                );
                for z in 0..p.local_nz() {
                    assert_eq!(f3.field[(lx, ly, z)], index_value_3d(file_ny, config.nz, gx, gy, z));
                }
            }
        }
    }
}

#[test]
fn test_interior_blocks_tile_the_file_once() {
    let config = mesh::six_ranks();
    let (file_nx, file_ny) = (config.nx, config.ny);
    let dataset = MemoryDataset::new().with_real("f", &[file_nx, file_ny], index_plane(file_nx, file_ny));

    let mut seen = vec![0usize; file_nx * file_ny];
    for rank in 0..config.num_ranks() {
        let p = config.partition(rank).unwrap();
        let mut grid = GridFile::open(MemoryFormat::from_dataset(dataset.clone()), "grid.nc").unwrap();
        let f = grid.load_field_2d(&p, "f", -1.0).unwrap().into_field();

        for lx in p.xstart()..=p.xend() {
            for ly in p.ystart()..=p.yend() {
                let value = f[(lx, ly)] as usize;
                seen[value] += 1;
            }
        }
    }
    assert!(seen.iter().all(|&n| n == 1));
}

#[test]
fn test_second_target_skips_inner_guard_rows() {
    let config = mesh::split_targets();
    let ny_inner = config.ny / 2;
    let guards = 2;
    let file_nx = config.nx + 2 * config.mxg;
    let file_ny = config.ny + 2 * guards * config.target_count;
    let dataset = MemoryDataset::new()
        .with_scalar_int(vars::Y_BOUNDARY_GUARDS, guards as i32)
        .with_scalar_int(vars::NY_INNER, ny_inner as i32)
        .with_real("f", &[file_nx, file_ny], index_plane(file_nx, file_ny));

    for rank in 0..config.num_ranks() {
        let p = config.partition(rank).unwrap();
        let mut grid = GridFile::open(MemoryFormat::from_dataset(dataset.clone()), "grid.nc").unwrap();
        let f = grid.load_field_2d(&p, "f", -1.0).unwrap().into_field();

        let shift = if p.offset_y() >= ny_inner { 2 * guards } else { 0 };
        for lx in 0..p.local_nx() {
            for ly in 0..p.local_ny() {
                let expected = index_value_2d(file_ny, lx, p.offset_y() + shift + ly);
                assert_eq!(f[(lx, ly)], expected, "rank {} local ({}, {})", rank, lx, ly);
            }
        }
    }
}
