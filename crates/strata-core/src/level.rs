//! Level primitives shared by every kernel.
//!
//! A kernel never touches raw position or coordinate arrays directly; it walks
//! levels through the views below and reaches matrices through the access
//! traits, which are implemented only for the formats that can serve them
//! cheaply:
//!
//! | trait          | CSR | CSC | COO |
//! |----------------|-----|-----|-----|
//! | [`RowScan`]    |  x  |     |  x  |
//! | [`ColScan`]    |     |  x  |  x  |
//! | [`PointLookup`]|  x  |  x  |  x  |
//! | [`Entries`]    |  x  |  x  |  x  |
//!
//! Kernels are generic over these traits, so each format combination is a
//! separate monomorphized instance and an unsupported combination does not
//! type-check.

#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p for indices"
)]

use crate::coo::Coo;
use crate::csc::Csc;
use crate::csr::Csr;
use crate::error::{Error, Result};
use crate::format::{Format, Tensor};
use core::ops::Range;

/// A compressed level: `pos` bounds the entries of each outer index in `crd`.
#[derive(Debug, Clone, Copy)]
pub struct Compressed<'a> {
    pos: &'a [usize],
    crd: &'a [usize],
}

impl<'a> Compressed<'a> {
    #[inline]
    #[must_use]
    pub const fn new(pos: &'a [usize], crd: &'a [usize]) -> Self {
        Self { pos, crd }
    }

    #[inline]
    #[must_use]
    pub fn outer_len(&self) -> usize {
        self.pos.len().saturating_sub(1)
    }

    /// Positions owned by outer index `i`.
    #[inline]
    #[must_use]
    pub fn range(&self, i: usize) -> Range<usize> {
        self.pos[i]..self.pos[i + 1]
    }

    /// Ranged scan: `(position, coordinate)` pairs of outer index `i`, in array
    /// order.
    #[inline]
    pub fn scan(&self, i: usize) -> impl Iterator<Item = (usize, usize)> + 'a {
        let crd = self.crd;
        self.range(i).map(move |p| (p, crd[p]))
    }

    /// Point lookup: position of the first entry of outer index `i` whose
    /// coordinate equals `target`.
    #[inline]
    #[must_use]
    pub fn locate(&self, i: usize, target: usize) -> Option<usize> {
        self.range(i).find(|&p| self.crd[p] == target)
    }
}

/// A coordinate-listed pair of levels with no index structure.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates<'a> {
    dim1: &'a [usize],
    dim2: &'a [usize],
}

impl<'a> Coordinates<'a> {
    #[inline]
    #[must_use]
    pub const fn new(dim1: &'a [usize], dim2: &'a [usize]) -> Self {
        Self { dim1, dim2 }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dim1.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dim1.is_empty()
    }

    /// Linear scan of the whole list; first match wins.
    #[inline]
    #[must_use]
    pub fn locate(&self, c1: usize, c2: usize) -> Option<usize> {
        (0..self.len()).find(|&p| self.dim1[p] == c1 && self.dim2[p] == c2)
    }

    /// Entries whose first coordinate is `c1`, as `(position, second coordinate)`.
    pub fn scan_dim1(&self, c1: usize) -> impl Iterator<Item = (usize, usize)> + 'a {
        let (dim1, dim2) = (self.dim1, self.dim2);
        (0..dim1.len())
            .filter(move |&p| dim1[p] == c1)
            .map(move |p| (p, dim2[p]))
    }

    /// Entries whose second coordinate is `c2`, as `(position, first coordinate)`.
    pub fn scan_dim2(&self, c2: usize) -> impl Iterator<Item = (usize, usize)> + 'a {
        let (dim1, dim2) = (self.dim1, self.dim2);
        (0..dim2.len())
            .filter(move |&p| dim2[p] == c2)
            .map(move |p| (p, dim1[p]))
    }
}

/// Dense level walk: every index is materialized.
#[inline]
#[must_use]
pub const fn dense_walk(size: usize) -> Range<usize> {
    0..size
}

// ---------------- matrix access ----------------

/// A 2D operand.
pub trait Matrix: Tensor {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
}

/// Enumerate the non-zeros of one row as `(col, value)`.
pub trait RowScan: Matrix {
    fn scan_row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_;
}

/// Enumerate the non-zeros of one column as `(row, value)`.
pub trait ColScan: Matrix {
    fn scan_col(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_;
}

/// Value stored at logical `(i, j)`, if any. Stops at the first match.
pub trait PointLookup: Matrix {
    fn lookup(&self, i: usize, j: usize) -> Option<f64>;
}

/// Visit every stored entry as `(row, col, value)` in storage order.
pub trait Entries: Matrix {
    fn for_each_entry<F: FnMut(usize, usize, f64)>(&self, f: F);
}

macro_rules! impl_matrix {
    ($ty:ty) => {
        impl Matrix for $ty {
            #[inline]
            fn nrows(&self) -> usize {
                self.nrows
            }
            #[inline]
            fn ncols(&self) -> usize {
                self.ncols
            }
        }
    };
}

impl_matrix!(Csr<f64, usize>);
impl_matrix!(Csc<f64, usize>);
impl_matrix!(Coo<f64, usize>);

impl RowScan for Csr<f64, usize> {
    #[inline]
    fn scan_row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let data = &self.data;
        self.level().scan(i).map(move |(p, j)| (j, data[p]))
    }
}

impl RowScan for Coo<f64, usize> {
    #[inline]
    fn scan_row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let data = &self.data;
        self.level().scan_dim1(i).map(move |(p, j)| (j, data[p]))
    }
}

impl ColScan for Csc<f64, usize> {
    #[inline]
    fn scan_col(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let data = &self.data;
        self.level().scan(j).map(move |(p, i)| (i, data[p]))
    }
}

impl ColScan for Coo<f64, usize> {
    #[inline]
    fn scan_col(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let data = &self.data;
        self.level().scan_dim2(j).map(move |(p, i)| (i, data[p]))
    }
}

impl PointLookup for Csr<f64, usize> {
    #[inline]
    fn lookup(&self, i: usize, j: usize) -> Option<f64> {
        self.level().locate(i, j).map(|p| self.data[p])
    }
}

impl PointLookup for Csc<f64, usize> {
    #[inline]
    fn lookup(&self, i: usize, j: usize) -> Option<f64> {
        self.level().locate(j, i).map(|p| self.data[p])
    }
}

impl PointLookup for Coo<f64, usize> {
    #[inline]
    fn lookup(&self, i: usize, j: usize) -> Option<f64> {
        self.level().locate(i, j).map(|p| self.data[p])
    }
}

impl Entries for Csr<f64, usize> {
    fn for_each_entry<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        let level = self.level();
        for i in dense_walk(self.nrows) {
            for (p, j) in level.scan(i) {
                f(i, j, self.data[p]);
            }
        }
    }
}

impl Entries for Csc<f64, usize> {
    fn for_each_entry<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        let level = self.level();
        for j in dense_walk(self.ncols) {
            for (p, i) in level.scan(j) {
                f(i, j, self.data[p]);
            }
        }
    }
}

impl Entries for Coo<f64, usize> {
    fn for_each_entry<F: FnMut(usize, usize, f64)>(&self, mut f: F) {
        for ((&i, &j), &v) in self.row.iter().zip(&self.col).zip(&self.data) {
            f(i, j, v);
        }
    }
}

// ---------------- output ----------------

/// A compressed matrix that a kernel fills in outer-index order.
///
/// The caller resets the writer first. The kernel then, for each outer index
/// in increasing order, pushes that index's entries and seals it, which
/// back-fills the position array.
pub trait LevelWriter: Matrix {
    /// Number of outer indices (rows for CSR, columns for CSC).
    fn outer_len(&self) -> usize;
    /// Extent of the coordinates pushed into each outer index.
    fn inner_len(&self) -> usize;
    /// Append one entry to the outer index currently being filled.
    ///
    /// Fails with [`Error::CapacityExceeded`] instead of growing past the
    /// allocated capacity.
    fn push(&mut self, crd: usize, val: f64) -> Result<()>;
    /// Close outer index `outer`: `pos[outer + 1] = nnz`.
    fn seal(&mut self, outer: usize);
}

macro_rules! impl_writer {
    ($ty:ty, $format:expr, $outer:ident, $inner:ident) => {
        impl LevelWriter for $ty {
            #[inline]
            fn outer_len(&self) -> usize {
                self.$outer
            }

            #[inline]
            fn inner_len(&self) -> usize {
                self.$inner
            }

            #[inline]
            fn push(&mut self, crd: usize, val: f64) -> Result<()> {
                debug_assert!(crd < self.$inner);
                if self.data.len() >= self.capacity {
                    return Err(Error::CapacityExceeded {
                        format: $format,
                        capacity: self.capacity,
                    });
                }
                self.indices.push(crd);
                self.data.push(val);
                Ok(())
            }

            #[inline]
            fn seal(&mut self, outer: usize) {
                self.indptr[outer + 1] = self.data.len();
            }
        }
    };
}

impl_writer!(Csr<f64, usize>, Format::Csr, nrows, ncols);
impl_writer!(Csc<f64, usize>, Format::Csc, ncols, nrows);
