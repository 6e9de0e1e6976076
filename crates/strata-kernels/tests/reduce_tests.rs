mod common;

use common::*;
use strata_core::{Dense, Error as CoreError};
use strata_kernels::{hadamard_transpose_reduce, permute_contract, Error};

fn b_2x2() -> Mat {
    vec![vec![1.0, 2.0], vec![0.0, 3.0]]
}

fn c_2x2() -> Mat {
    vec![vec![4.0, 0.0], vec![5.0, 6.0]]
}

#[test]
fn test_reduce_basic() {
    let mut y = Dense::zeros(2);
    hadamard_transpose_reduce(&mut y, &csr(&b_2x2()), &csr(&c_2x2())).unwrap();
    assert_eq!(y.data, vec![14.0, 18.0]);
}

#[test]
fn test_reduce_every_combination() {
    let b = pseudo_random(5, 3, 0.7, 51);
    let c = pseudo_random(3, 5, 0.7, 52);
    let want = ref_reduce(&b, &c);

    macro_rules! check {
        ($bf:ident, $cf:ident) => {{
            let mut y = Dense::zeros(5);
            hadamard_transpose_reduce(&mut y, &$bf(&b), &$cf(&c)).unwrap();
            assert_vec_eq(&y.data, &want);
        }};
    }
    check!(csr, csr);
    check!(csr, csc);
    check!(csr, coo);
    check!(csc, csr);
    check!(csc, csc);
    check!(csc, coo);
    check!(coo, csr);
    check!(coo, csc);
    check!(coo, coo);
}

#[test]
fn test_reduce_accumulates_into_output() {
    let mut y = Dense::from_vec(vec![1.0, -1.0]);
    hadamard_transpose_reduce(&mut y, &coo(&b_2x2()), &csc(&c_2x2())).unwrap();
    assert_eq!(y.data, vec![15.0, 17.0]);
}

#[test]
fn test_reduce_shape_mismatch() {
    let mut y = Dense::zeros(3);
    let err = hadamard_transpose_reduce(&mut y, &csr(&b_2x2()), &csr(&c_2x2())).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::ShapeMismatch { ref expected, ref got, .. })
            if expected == &vec![2] && got == &vec![3]
    ));
}

#[test]
fn test_permute_contract_basic() {
    let b = csf(
        [2, 2, 2],
        &[((0, 0, 0), 1.0), ((0, 0, 1), 2.0), ((1, 1, 1), 3.0)],
    );
    let c = csf(
        [2, 2, 2],
        &[((0, 0, 0), 4.0), ((1, 0, 1), 5.0), ((1, 1, 1), 6.0)],
    );
    let mut y = Dense::zeros(2);
    permute_contract(&mut y, &b, &c).unwrap();
    assert_eq!(y.data, vec![4.0, 18.0]);
}

#[test]
fn test_permute_contract_rectangular() {
    // B is 2 x 3 x 2, C is 2 x 2 x 3
    let b_entries = [
        ((0, 0, 1), 1.0),
        ((0, 2, 0), 2.0),
        ((0, 2, 1), 3.0),
        ((1, 1, 0), 4.0),
    ];
    let c_entries = [
        ((0, 0, 2), 5.0),
        ((0, 1, 0), 6.0),
        ((0, 1, 2), 7.0),
        ((1, 0, 1), 8.0),
        ((1, 1, 1), 9.0),
    ];
    let b = csf([2, 3, 2], &b_entries);
    let c = csf([2, 2, 3], &c_entries);

    let mut want = [0.0; 2];
    for &((i, j, k), bv) in &b_entries {
        for &((ci, ck, cj), cv) in &c_entries {
            if (ci, ck, cj) == (i, k, j) {
                want[i] += bv * cv;
            }
        }
    }
    // B(0,0,1)·C(0,1,0) + B(0,2,0)·C(0,0,2) + B(0,2,1)·C(0,1,2), then B(1,1,0)·C(1,0,1)
    assert_eq!(want, [1.0 * 6.0 + 2.0 * 5.0 + 3.0 * 7.0, 4.0 * 8.0]);

    let mut y = Dense::zeros(2);
    permute_contract(&mut y, &b, &c).unwrap();
    assert_vec_eq(&y.data, &want);
}

#[test]
fn test_permute_contract_shape_mismatch() {
    let b = csf([2, 3, 2], &[((0, 0, 0), 1.0)]);
    let c = csf([2, 3, 2], &[((0, 0, 0), 1.0)]);
    let mut y = Dense::zeros(2);
    assert!(matches!(
        permute_contract(&mut y, &b, &c),
        Err(Error::Core(CoreError::ShapeMismatch { op: "permute_contract", .. }))
    ));
}
