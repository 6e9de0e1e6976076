//! `A(i,j) = B(i,j) * C(j,i)` into a compressed output.
//!
//! One operand drives: it is walked along the output's outer index and every
//! non-zero it yields is matched by a point lookup into the other operand at
//! the transposed coordinate. An entry is emitted only when both values are
//! non-zero.

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use crate::error::{check_shape, Result};
use crate::search::{SearchB, SearchC, SearchStrategy};
use strata_core::{
    dense_walk, ColScan, Csc, Csr, Format, LevelWriter, Matrix, PointLookup, RowScan,
};

/// Output formats that can receive `B ∘ Cᵀ` with search order `S`.
///
/// Implemented only where the driving operand can enumerate the output's
/// outer index:
///
/// | output | `S`       | driver             | probed         |
/// |--------|-----------|--------------------|----------------|
/// | CSR    | `SearchC` | B rows (CSR, COO)    | C (CSR, CSC, COO) |
/// | CSC    | `SearchC` | B columns (CSC, COO) | C              |
/// | CSR    | `SearchB` | C columns (CSC, COO) | B              |
/// | CSC    | `SearchB` | C rows (CSR, COO)    | B              |
///
/// Any other combination is rejected by the compiler:
///
/// ```compile_fail
/// use strata_core::{Csc, Csr};
/// use strata_kernels::{hadamard_transpose, SearchC};
///
/// let b = Csc::allocate(2, 2, 0);
/// let c = Csr::allocate(2, 2, 0);
/// let mut a = Csr::allocate(2, 2, 4);
/// // a column-major B cannot drive a row-major output
/// hadamard_transpose::<SearchC, _, _, _>(&mut a, &b, &c).unwrap();
/// ```
pub trait HadamardTranspose<B, C, S: SearchStrategy>: LevelWriter {
    /// Fill `self`, which must be reset, with `B ∘ Cᵀ`.
    fn hadamard_transpose(&mut self, b: &B, c: &C) -> Result<()>;
}

/// `a = b ∘ cᵀ` with the search order chosen by type, e.g.
/// `hadamard_transpose::<SearchC, _, _, _>(&mut a, &b, &c)`.
#[inline]
pub fn hadamard_transpose<S, A, B, C>(a: &mut A, b: &B, c: &C) -> Result<()>
where
    S: SearchStrategy,
    A: HadamardTranspose<B, C, S>,
{
    a.hadamard_transpose(b, c)
}

/// B is `m × n`, C is `n × m`, A is `m × n`.
fn check_shapes<W: Matrix, B: Matrix, C: Matrix>(a: &W, b: &B, c: &C) -> Result<()> {
    let (m, n) = (b.nrows(), b.ncols());
    check_shape("hadamard_transpose", &[n, m], &[c.nrows(), c.ncols()])?;
    check_shape("hadamard_transpose", &[m, n], &[a.nrows(), a.ncols()])
}

/// Drive one outer index at a time: `gather` collects `(inner, value)` for
/// outer index `o`, which is then pushed and sealed.
///
/// A coordinate-list driver yields entries in storage order, so its rows are
/// sorted before they are written; compressed drivers are already in order.
fn fill_outer<W, F>(out: &mut W, driver: Format, mut gather: F) -> Result<()>
where
    W: LevelWriter,
    F: FnMut(usize, &mut Vec<(usize, f64)>),
{
    let sorted = driver != Format::Coo;
    let mut row = Vec::new();
    for o in dense_walk(out.outer_len()) {
        row.clear();
        gather(o, &mut row);
        if !sorted {
            row.sort_unstable_by_key(|&(crd, _)| crd);
        }
        for &(crd, v) in &row {
            out.push(crd, v)?;
        }
        out.seal(o);
    }
    Ok(())
}

#[inline]
fn product(x: f64, y: Option<f64>) -> Option<f64> {
    match y {
        Some(y) if x != 0.0 && y != 0.0 => Some(x * y),
        _ => None,
    }
}

// search-C: B drives, C is probed at (j, i)

impl<B, C> HadamardTranspose<B, C, SearchC> for Csr<f64, usize>
where
    B: RowScan,
    C: PointLookup,
{
    fn hadamard_transpose(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes(&*self, b, c)?;
        fill_outer(self, B::FORMAT, |i, row| {
            for (j, bv) in b.scan_row(i) {
                if let Some(v) = product(bv, c.lookup(j, i)) {
                    row.push((j, v));
                }
            }
        })
    }
}

impl<B, C> HadamardTranspose<B, C, SearchC> for Csc<f64, usize>
where
    B: ColScan,
    C: PointLookup,
{
    fn hadamard_transpose(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes(&*self, b, c)?;
        fill_outer(self, B::FORMAT, |j, col| {
            for (i, bv) in b.scan_col(j) {
                if let Some(v) = product(bv, c.lookup(j, i)) {
                    col.push((i, v));
                }
            }
        })
    }
}

// search-B: C drives, B is probed at (i, j)

impl<B, C> HadamardTranspose<B, C, SearchB> for Csr<f64, usize>
where
    B: PointLookup,
    C: ColScan,
{
    fn hadamard_transpose(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes(&*self, b, c)?;
        // row i of A is column i of C
        fill_outer(self, C::FORMAT, |i, row| {
            for (j, cv) in c.scan_col(i) {
                if let Some(v) = product(cv, b.lookup(i, j)) {
                    row.push((j, v));
                }
            }
        })
    }
}

impl<B, C> HadamardTranspose<B, C, SearchB> for Csc<f64, usize>
where
    B: PointLookup,
    C: RowScan,
{
    fn hadamard_transpose(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes(&*self, b, c)?;
        fill_outer(self, C::FORMAT, |j, col| {
            for (i, cv) in c.scan_row(j) {
                if let Some(v) = product(cv, b.lookup(i, j)) {
                    col.push((i, v));
                }
            }
        })
    }
}
