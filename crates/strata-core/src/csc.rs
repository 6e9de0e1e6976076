//! CSC format definitions and constructors

use crate::error::{Error, Result};
use crate::format::{Format, Tensor};
use crate::level::Compressed;
use crate::validate::Validate;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csc<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // row indices per column
    pub indptr: Vec<I>,  // column pointer, length ncols + 1
    pub ncols: usize,
    pub nrows: usize,
    pub capacity: usize, // output nnz bound
}

impl<T, I> Csc<T, I> {
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

impl Csc<f64, usize> {
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        let csc = Self::from_parts_unchecked(nrows, ncols, indptr, indices, data);
        let checked = if check {
            csc.validate()
        } else {
            csc.validate_structure()
        };
        checked.map_err(|v| Error::invalid("csc", v))?;
        Ok(csc)
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
            data,
            indices,
            indptr,
            ncols,
            nrows,
            capacity,
        }
    }

    /// Empty output matrix able to receive up to `capacity` non-zeros.
    #[must_use]
    pub fn allocate(nrows: usize, ncols: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
            indptr: vec![0; ncols + 1],
            ncols,
            nrows,
            capacity,
        }
    }

    /// Drop every entry and zero the column pointer; dimensions and capacity stay.
    pub fn reset(&mut self) {
        self.indices.clear();
        self.data.clear();
        self.indptr.fill(0);
    }

    /// The compressed row level, indexed by column.
    #[inline]
    #[must_use]
    pub fn level(&self) -> Compressed<'_> {
        Compressed::new(&self.indptr, &self.indices)
    }
}

impl Tensor for Csc<f64, usize> {
    const FORMAT: Format = Format::Csc;

    fn nnz(&self) -> usize {
        self.data.len()
    }
}
