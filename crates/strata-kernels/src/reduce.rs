//! Reductions into a dense vector.

use crate::error::{check_shape, Result};
use strata_core::{dense_walk, Csf, Dense, Entries, PointLookup};

/// `y(i) += sum_j B(i,j) * C(j,i)`, for any B and C stored as CSR, CSC or COO.
///
/// Every stored entry of B is visited once and paired with the first
/// matching entry of C. `y` must hold `nrows(B)` entries and is accumulated
/// into, not overwritten.
pub trait HadamardTransposeReduce<B, C> {
    fn hadamard_transpose_reduce(&mut self, b: &B, c: &C) -> Result<()>;
}

/// `y(i) += sum_{j,k} B(i,j,k) * C(i,k,j)` over two CSF tensors with
/// `B.dims = [d1, d2, d3]`, `C.dims = [d1, d3, d2]` and `y.size = d1`.
pub trait PermuteContract<B, C> {
    fn permute_contract(&mut self, b: &B, c: &C) -> Result<()>;
}

#[inline]
pub fn hadamard_transpose_reduce<Y, B, C>(y: &mut Y, b: &B, c: &C) -> Result<()>
where
    Y: HadamardTransposeReduce<B, C>,
{
    y.hadamard_transpose_reduce(b, c)
}

#[inline]
pub fn permute_contract<Y, B, C>(y: &mut Y, b: &B, c: &C) -> Result<()>
where
    Y: PermuteContract<B, C>,
{
    y.permute_contract(b, c)
}

impl<B, C> HadamardTransposeReduce<B, C> for Dense<f64>
where
    B: Entries,
    C: PointLookup,
{
    fn hadamard_transpose_reduce(&mut self, b: &B, c: &C) -> Result<()> {
        let (m, n) = (b.nrows(), b.ncols());
        check_shape("hadamard_transpose_reduce", &[n, m], &[c.nrows(), c.ncols()])?;
        check_shape("hadamard_transpose_reduce", &[m], &[self.size()])?;
        let y = &mut self.data;
        b.for_each_entry(|i, j, bv| {
            if let Some(cv) = c.lookup(j, i) {
                y[i] += bv * cv;
            }
        });
        Ok(())
    }
}

impl PermuteContract<Csf<f64, usize>, Csf<f64, usize>> for Dense<f64> {
    fn permute_contract(&mut self, b: &Csf<f64, usize>, c: &Csf<f64, usize>) -> Result<()> {
        let [d1, d2, d3] = b.shape();
        check_shape("permute_contract", &[d1, d3, d2], &c.shape())?;
        check_shape("permute_contract", &[d1], &[self.size()])?;

        let (b_fibers, b_entries) = (b.fibers(), b.entries());
        let (c_fibers, c_entries) = (c.fibers(), c.entries());
        for i in dense_walk(d1) {
            let mut sum = 0.0;
            for (fb, j) in b_fibers.scan(i) {
                for (fc, k) in c_fibers.scan(i) {
                    let Some(pb) = b_entries.locate(fb, k) else {
                        continue;
                    };
                    if let Some(pc) = c_entries.locate(fc, j) {
                        sum += b.data[pb] * c.data[pc];
                    }
                }
            }
            self.data[i] += sum;
        }
        Ok(())
    }
}
