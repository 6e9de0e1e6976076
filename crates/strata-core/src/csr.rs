//! CSR format definitions and constructors

use crate::error::{Error, Result};
use crate::format::{Format, Tensor};
use crate::level::Compressed;
use crate::validate::Validate;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csr<T, I> {
    pub nrows: usize,
    pub ncols: usize,
    pub indptr: Vec<I>,  // row pointer, length nrows + 1
    pub indices: Vec<I>, // column indices per row
    pub data: Vec<T>,
    /// Largest nnz the matrix may hold when filled in by a kernel.
    pub capacity: usize,
}

impl<T, I> Csr<T, I> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl Csr<f64, usize> {
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        let csr = Self::from_parts_unchecked(nrows, ncols, indptr, indices, data);
        let checked = if check {
            csr.validate()
        } else {
            csr.validate_structure()
        };
        checked.map_err(|v| Error::invalid("csr", v))?;
        Ok(csr)
    }

    #[inline]
    #[must_use]
    pub fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        let capacity = data.len();
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
            capacity,
        }
    }

    /// Empty output matrix able to receive up to `capacity` non-zeros.
    #[must_use]
    pub fn allocate(nrows: usize, ncols: usize, capacity: usize) -> Self {
        Self {
            nrows,
            ncols,
            indptr: vec![0; nrows + 1],
            indices: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Drop every entry and zero the row pointer; dimensions and capacity stay.
    pub fn reset(&mut self) {
        self.indices.clear();
        self.data.clear();
        self.indptr.fill(0);
    }

    /// The compressed column level, indexed by row.
    #[inline]
    #[must_use]
    pub fn level(&self) -> Compressed<'_> {
        Compressed::new(&self.indptr, &self.indices)
    }
}

impl Tensor for Csr<f64, usize> {
    const FORMAT: Format = Format::Csr;

    fn nnz(&self) -> usize {
        self.data.len()
    }
}
