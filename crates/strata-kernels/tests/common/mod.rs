#![allow(dead_code)]
//! Dense fixtures and reference computations shared by the kernel tests.

use strata_core::{Coo, Csc, Csf, Csr, Entries, Validate};

pub type Mat = Vec<Vec<f64>>;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
}

pub fn zeros(m: usize, n: usize) -> Mat {
    vec![vec![0.0; n]; m]
}

pub fn identity(n: usize, scale: f64) -> Mat {
    let mut a = zeros(n, n);
    for (i, row) in a.iter_mut().enumerate() {
        row[i] = scale;
    }
    a
}

fn shape(a: &[Vec<f64>]) -> (usize, usize) {
    (a.len(), a.first().map_or(0, Vec::len))
}

pub fn csr(a: &[Vec<f64>]) -> Csr<f64, usize> {
    let (m, n) = shape(a);
    let mut indptr = vec![0];
    let (mut indices, mut data) = (Vec::new(), Vec::new());
    for row in a {
        for (j, &v) in row.iter().enumerate() {
            if v != 0.0 {
                indices.push(j);
                data.push(v);
            }
        }
        indptr.push(data.len());
    }
    Csr::from_parts(m, n, indptr, indices, data, true).unwrap()
}

pub fn csc(a: &[Vec<f64>]) -> Csc<f64, usize> {
    let (m, n) = shape(a);
    let mut indptr = vec![0];
    let (mut indices, mut data) = (Vec::new(), Vec::new());
    for j in 0..n {
        for (i, row) in a.iter().enumerate() {
            if row[j] != 0.0 {
                indices.push(i);
                data.push(row[j]);
            }
        }
        indptr.push(data.len());
    }
    Csc::from_parts(m, n, indptr, indices, data, true).unwrap()
}

/// Coordinate list in reverse row-major order, so kernels cannot rely on
/// COO operands being sorted.
pub fn coo(a: &[Vec<f64>]) -> Coo<f64, usize> {
    let (m, n) = shape(a);
    let (mut row, mut col, mut data) = (Vec::new(), Vec::new(), Vec::new());
    for (i, r) in a.iter().enumerate().rev() {
        for (j, &v) in r.iter().enumerate().rev() {
            if v != 0.0 {
                row.push(i);
                col.push(j);
                data.push(v);
            }
        }
    }
    Coo::from_parts(m, n, row, col, data, true).unwrap()
}

/// Same as [`csr`] but keeps explicit zeros at the given coordinates.
pub fn csr_with_zeros(a: &[Vec<f64>], zeros_at: &[(usize, usize)]) -> Csr<f64, usize> {
    let (m, n) = shape(a);
    let mut indptr = vec![0];
    let (mut indices, mut data) = (Vec::new(), Vec::new());
    for (i, row) in a.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            if v != 0.0 || zeros_at.contains(&(i, j)) {
                indices.push(j);
                data.push(v);
            }
        }
        indptr.push(data.len());
    }
    Csr::from_parts(m, n, indptr, indices, data, true).unwrap()
}

/// CSF from `((i, j, k), value)` pairs sorted lexicographically.
pub fn csf(dims: [usize; 3], entries: &[((usize, usize, usize), f64)]) -> Csf<f64, usize> {
    let mut slice_ptr = vec![0; dims[0] + 1];
    let (mut fiber_idx, mut fiber_ptr) = (Vec::new(), vec![0]);
    let (mut indices, mut data) = (Vec::new(), Vec::new());
    let mut last: Option<(usize, usize)> = None;
    for &((i, j, k), v) in entries {
        if last != Some((i, j)) {
            if last.is_some() {
                fiber_ptr.push(data.len());
            }
            fiber_idx.push(j);
            slice_ptr[i + 1] += 1;
            last = Some((i, j));
        }
        indices.push(k);
        data.push(v);
    }
    if last.is_some() {
        fiber_ptr.push(data.len());
    }
    for i in 0..dims[0] {
        slice_ptr[i + 1] += slice_ptr[i];
    }
    Csf::from_parts(dims, slice_ptr, fiber_idx, fiber_ptr, indices, data, true).unwrap()
}

pub fn to_dense<M: Entries>(a: &M) -> Mat {
    let mut out = zeros(a.nrows(), a.ncols());
    a.for_each_entry(|i, j, v| out[i][j] += v);
    out
}

/// Dense result of a kernel output, after checking that its coordinates are
/// sorted, in bounds and unique.
pub fn checked_dense<M: Entries + Validate>(a: &M) -> Mat {
    a.validate().unwrap();
    to_dense(a)
}

pub fn ref_hadamard_transpose(b: &[Vec<f64>], c: &[Vec<f64>]) -> Mat {
    let (m, n) = shape(b);
    let mut a = zeros(m, n);
    for i in 0..m {
        for j in 0..n {
            a[i][j] = b[i][j] * c[j][i];
        }
    }
    a
}

pub fn ref_matmul(b: &[Vec<f64>], c: &[Vec<f64>]) -> Mat {
    let (m, k) = shape(b);
    let n = shape(c).1;
    let mut a = zeros(m, n);
    for i in 0..m {
        for p in 0..k {
            for j in 0..n {
                a[i][j] += b[i][p] * c[p][j];
            }
        }
    }
    a
}

pub fn ref_matmul_hadamard(b: &[Vec<f64>], c: &[Vec<f64>], d: &[Vec<f64>]) -> Mat {
    let cd: Mat = c
        .iter()
        .zip(d)
        .map(|(cr, dr)| cr.iter().zip(dr).map(|(x, y)| x * y).collect())
        .collect();
    ref_matmul(b, &cd)
}

pub fn ref_reduce(b: &[Vec<f64>], c: &[Vec<f64>]) -> Vec<f64> {
    ref_hadamard_transpose(b, c)
        .iter()
        .map(|row| row.iter().sum())
        .collect()
}

pub fn assert_mat_eq(got: &[Vec<f64>], want: &[Vec<f64>]) {
    assert_eq!(shape(got), shape(want), "shape");
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        for (j, (&x, &y)) in g.iter().zip(w).enumerate() {
            assert!(approx_eq(x, y), "({i}, {j}): got {x}, want {y}");
        }
    }
}

pub fn assert_vec_eq(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len(), "length");
    for (i, (&x, &y)) in got.iter().zip(want).enumerate() {
        assert!(approx_eq(x, y), "[{i}]: got {x}, want {y}");
    }
}

/// Deterministic sparse matrix with roughly `density` of its cells filled.
pub fn pseudo_random(m: usize, n: usize, density: f64, seed: u64) -> Mat {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    let mut a = zeros(m, n);
    for row in &mut a {
        for cell in row.iter_mut() {
            if next() < density {
                *cell = (next() * 8.0).floor() - 3.0;
            }
        }
    }
    a
}
