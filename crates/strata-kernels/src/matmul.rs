//! Gather-then-compress matrix products.
//!
//! Each outer index of the output is gathered into a [`DenseAccumulator`]
//! sized to the output's inner dimension and then compressed in coordinate
//! order, so outputs come out sorted whatever order the operands are stored
//! in. Sums that cancel to exactly zero are not stored.

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use crate::error::{check_shape, Result};
use strata_core::{
    dense_walk, ColScan, Csc, Csr, DenseAccumulator, LevelWriter, Matrix, PointLookup, RowScan,
};

/// `A = B · C`, implemented for CSR outputs over row-scannable operands and
/// CSC outputs over column-scannable operands.
pub trait Matmul<B, C>: LevelWriter {
    fn matmul(&mut self, b: &B, c: &C) -> Result<()>;
}

/// `A = B · (C ∘ D)`: the matmul traversal with every `C(k,j)` weighted by a
/// point lookup of `D(k,j)`. Pairs without a stored `D(k,j)` contribute
/// nothing.
pub trait MatmulHadamard<B, C, D>: LevelWriter {
    fn matmul_hadamard(&mut self, b: &B, c: &C, d: &D) -> Result<()>;
}

#[inline]
pub fn matmul<A, B, C>(a: &mut A, b: &B, c: &C) -> Result<()>
where
    A: Matmul<B, C>,
{
    a.matmul(b, c)
}

#[inline]
pub fn matmul_hadamard<A, B, C, D>(a: &mut A, b: &B, c: &C, d: &D) -> Result<()>
where
    A: MatmulHadamard<B, C, D>,
{
    a.matmul_hadamard(b, c, d)
}

/// B is `m × k`, C is `k × n`, A is `m × n`.
fn check_shapes<W, B, C>(op: &'static str, a: &W, b: &B, c: &C) -> Result<()>
where
    W: Matrix,
    B: Matrix,
    C: Matrix,
{
    let k = b.ncols();
    check_shape(op, &[k, a.ncols()], &[c.nrows(), c.ncols()])?;
    check_shape(op, &[b.nrows(), c.ncols()], &[a.nrows(), a.ncols()])
}

/// Gather each outer index with `gather`, then compress it into `out`.
fn accumulate<W, F>(out: &mut W, mut gather: F) -> Result<()>
where
    W: LevelWriter,
    F: FnMut(usize, &mut DenseAccumulator),
{
    let mut acc = DenseAccumulator::new(out.inner_len());
    for o in dense_walk(out.outer_len()) {
        acc.begin(o);
        gather(o, &mut acc);
        acc.drain(out)?;
        out.seal(o);
    }
    Ok(())
}

impl<B, C> Matmul<B, C> for Csr<f64, usize>
where
    B: RowScan,
    C: RowScan,
{
    fn matmul(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes("matmul", &*self, b, c)?;
        accumulate(self, |i, acc| {
            for (k, bv) in b.scan_row(i) {
                for (j, cv) in c.scan_row(k) {
                    acc.add(j, bv * cv);
                }
            }
        })
    }
}

impl<B, C> Matmul<B, C> for Csc<f64, usize>
where
    B: ColScan,
    C: ColScan,
{
    fn matmul(&mut self, b: &B, c: &C) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes("matmul", &*self, b, c)?;
        accumulate(self, |j, acc| {
            for (k, cv) in c.scan_col(j) {
                for (i, bv) in b.scan_col(k) {
                    acc.add(i, bv * cv);
                }
            }
        })
    }
}

impl<B, C, D> MatmulHadamard<B, C, D> for Csr<f64, usize>
where
    B: RowScan,
    C: RowScan,
    D: PointLookup,
{
    fn matmul_hadamard(&mut self, b: &B, c: &C, d: &D) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes("matmul_hadamard", &*self, b, c)?;
        check_shape(
            "matmul_hadamard",
            &[c.nrows(), c.ncols()],
            &[d.nrows(), d.ncols()],
        )?;
        accumulate(self, |i, acc| {
            for (k, bv) in b.scan_row(i) {
                for (j, cv) in c.scan_row(k) {
                    if let Some(dv) = d.lookup(k, j) {
                        acc.add(j, bv * cv * dv);
                    }
                }
            }
        })
    }
}

impl<B, C, D> MatmulHadamard<B, C, D> for Csc<f64, usize>
where
    B: ColScan,
    C: ColScan,
    D: PointLookup,
{
    fn matmul_hadamard(&mut self, b: &B, c: &C, d: &D) -> Result<()> {
        debug_assert_eq!(self.nnz(), 0, "output must be reset before the kernel runs");
        check_shapes("matmul_hadamard", &*self, b, c)?;
        check_shape(
            "matmul_hadamard",
            &[c.nrows(), c.ncols()],
            &[d.nrows(), d.ncols()],
        )?;
        accumulate(self, |j, acc| {
            for (k, cv) in c.scan_col(j) {
                let Some(dv) = d.lookup(k, j) else {
                    continue;
                };
                for (i, bv) in b.scan_col(k) {
                    acc.add(i, bv * cv * dv);
                }
            }
        })
    }
}
