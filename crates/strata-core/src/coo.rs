//! COO format definitions and constructors

use crate::error::{Error, Result};
use crate::format::{Format, Tensor};
use crate::level::Coordinates;
use crate::validate::Validate;

/// Coordinate list. Entries are unordered and the format itself does not
/// enforce unique coordinates; see [`Validate::validate`] for the opt-in check.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Coo<T, I> {
    pub data: Vec<T>,
    pub row: Vec<I>, // length nnz
    pub col: Vec<I>, // length nnz
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Coo<T, I> {
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Coo<f64, usize> {
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        let coo = Self::from_parts_unchecked(nrows, ncols, row, col, data);
        let checked = if check {
            coo.validate()
        } else {
            coo.validate_structure()
        };
        checked.map_err(|v| Error::invalid("coo", v))?;
        Ok(coo)
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        row: Vec<usize>,
        col: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            data,
            row,
            col,
            ncols,
            nrows,
        }
    }

    pub fn reset(&mut self) {
        self.row.clear();
        self.col.clear();
        self.data.clear();
    }

    #[inline]
    #[must_use]
    pub fn level(&self) -> Coordinates<'_> {
        Coordinates::new(&self.row, &self.col)
    }
}

impl Tensor for Coo<f64, usize> {
    const FORMAT: Format = Format::Coo;

    fn nnz(&self) -> usize {
        self.data.len()
    }
}
