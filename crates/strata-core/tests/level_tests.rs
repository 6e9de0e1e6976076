use strata_core::{
    dense_walk, ColScan, Compressed, Coo, Coordinates, Csc, Csr, DenseAccumulator, Entries, Error,
    Format, LevelWriter, Matrix, PointLookup, RowScan,
};

// A = [[1, 0, 2],
//      [0, 3, 0]]
fn csr_a() -> Csr<f64, usize> {
    Csr::from_parts(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], true).unwrap()
}

fn csc_a() -> Csc<f64, usize> {
    Csc::from_parts(2, 3, vec![0, 1, 2, 3], vec![0, 1, 0], vec![1.0, 3.0, 2.0], true).unwrap()
}

fn coo_a() -> Coo<f64, usize> {
    // deliberately out of row order
    Coo::from_parts(2, 3, vec![1, 0, 0], vec![1, 2, 0], vec![3.0, 2.0, 1.0], true).unwrap()
}

#[test]
fn compressed_scan_and_locate() {
    let pos = [0, 2, 2, 5];
    let crd = [1, 4, 0, 2, 3];
    let level = Compressed::new(&pos, &crd);
    assert_eq!(level.outer_len(), 3);
    assert_eq!(level.range(2), 2..5);
    assert_eq!(level.scan(0).collect::<Vec<_>>(), vec![(0, 1), (1, 4)]);
    assert_eq!(level.scan(1).count(), 0);
    assert_eq!(level.locate(2, 3), Some(4));
    assert_eq!(level.locate(2, 1), None);
    assert_eq!(level.locate(1, 0), None);
}

#[test]
fn coordinate_scans_filter_in_storage_order() {
    let rows = [1, 0, 1, 1];
    let cols = [2, 2, 0, 1];
    let level = Coordinates::new(&rows, &cols);
    assert_eq!(level.len(), 4);
    assert!(!level.is_empty());
    assert_eq!(level.scan_dim1(1).collect::<Vec<_>>(), vec![(0, 2), (2, 0), (3, 1)]);
    assert_eq!(level.scan_dim2(2).collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    assert_eq!(level.locate(1, 1), Some(3));
    assert_eq!(level.locate(0, 0), None);
}

#[test]
fn coordinate_locate_takes_first_match() {
    let rows = [0, 0];
    let cols = [1, 1];
    assert_eq!(Coordinates::new(&rows, &cols).locate(0, 1), Some(0));
}

#[test]
fn dense_walk_covers_every_index() {
    assert_eq!(dense_walk(3).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(dense_walk(0).count(), 0);
}

#[test]
fn access_traits_agree_across_formats() {
    let (r, c, o) = (csr_a(), csc_a(), coo_a());
    for i in 0..2 {
        for j in 0..3 {
            let v = r.lookup(i, j);
            assert_eq!(c.lookup(i, j), v, "csc ({i}, {j})");
            assert_eq!(o.lookup(i, j), v, "coo ({i}, {j})");
        }
    }
    assert_eq!(r.lookup(0, 2), Some(2.0));
    assert_eq!(r.lookup(1, 0), None);

    assert_eq!(r.scan_row(0).collect::<Vec<_>>(), vec![(0, 1.0), (2, 2.0)]);
    assert_eq!(o.scan_row(0).collect::<Vec<_>>(), vec![(2, 2.0), (0, 1.0)]);
    assert_eq!(c.scan_col(2).collect::<Vec<_>>(), vec![(0, 2.0)]);
    assert_eq!(o.scan_col(1).collect::<Vec<_>>(), vec![(1, 3.0)]);

    let mut seen = Vec::new();
    c.for_each_entry(|i, j, v| seen.push((i, j, v)));
    assert_eq!(seen, vec![(0, 0, 1.0), (1, 1, 3.0), (0, 2, 2.0)]);
    assert_eq!((c.nrows(), c.ncols()), (2, 3));
}

#[test]
fn writer_seals_each_outer_index() {
    let mut out = Csr::allocate(3, 4, 4);
    assert_eq!((out.outer_len(), out.inner_len()), (3, 4));
    out.push(1, 1.0).unwrap();
    out.push(3, 2.0).unwrap();
    out.seal(0);
    out.seal(1);
    out.push(0, 3.0).unwrap();
    out.seal(2);
    assert_eq!(out.indptr, vec![0, 2, 2, 3]);
    assert_eq!(out.indices, vec![1, 3, 0]);

    let mut out = Csc::allocate(4, 2, 2);
    assert_eq!((out.outer_len(), out.inner_len()), (2, 4));
    out.push(3, 1.0).unwrap();
    out.seal(0);
    out.seal(1);
    assert_eq!(out.indptr, vec![0, 1, 1]);
}

#[test]
fn writer_refuses_to_grow_past_capacity() {
    let mut out = Csr::allocate(1, 4, 1);
    out.push(0, 1.0).unwrap();
    let err = out.push(1, 2.0).unwrap_err();
    assert_eq!(
        err,
        Error::CapacityExceeded {
            format: Format::Csr,
            capacity: 1
        }
    );
    assert_eq!(out.nnz(), 1);
}

#[test]
fn accumulator_emits_in_coordinate_order_and_skips_zeros() {
    let mut acc = DenseAccumulator::new(4);
    let mut out = Csr::allocate(2, 4, 8);

    acc.begin(0);
    acc.add(3, 1.0);
    acc.add(1, 2.0);
    acc.add(1, -2.0);
    acc.add(0, 0.5);
    acc.drain(&mut out).unwrap();
    out.seal(0);

    // cells of the previous epoch must not leak into this one
    acc.begin(1);
    acc.add(2, 5.0);
    acc.drain(&mut out).unwrap();
    out.seal(1);

    assert_eq!(out.indptr, vec![0, 2, 3]);
    assert_eq!(out.indices, vec![0, 3, 2]);
    assert_eq!(out.data, vec![0.5, 1.0, 5.0]);
}

#[test]
fn accumulator_surfaces_capacity_errors() {
    let mut acc = DenseAccumulator::new(3);
    let mut out = Csc::allocate(3, 1, 1);
    acc.begin(0);
    acc.add(0, 1.0);
    acc.add(2, 1.0);
    assert!(matches!(
        acc.drain(&mut out),
        Err(Error::CapacityExceeded { format: Format::Csc, .. })
    ));
}
