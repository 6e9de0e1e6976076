//! Dense 1D vector

use crate::format::{Format, Tensor};

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Dense<T> {
    pub data: Vec<T>, // length size
}

impl<T> Dense<T> {
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Dense<f64> {
    /// Zero-filled vector, ready to receive a reduction.
    #[inline]
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size],
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Every index is materialized.
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.data.fill(0.0);
    }
}

impl Tensor for Dense<f64> {
    const FORMAT: Format = Format::Dense;

    fn nnz(&self) -> usize {
        self.data.len()
    }
}
