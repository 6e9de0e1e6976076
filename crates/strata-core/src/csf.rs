//! CSF (compressed sparse fiber) format for 3-way tensors
//!
//! Level 1 is dense: every slice `i` in `0..dims[0]` owns the fiber range
//! `slice_ptr[i]..slice_ptr[i + 1]`. Level 2 is compressed, naming each
//! non-empty fiber `(i, j)` in `fiber_idx`. Level 3 is compressed, bounding
//! the entries of fiber `f` by `fiber_ptr[f]..fiber_ptr[f + 1]`.

use crate::error::{Error, Result};
use crate::format::{Format, Tensor};
use crate::level::Compressed;
use crate::validate::Validate;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csf<T, I> {
    pub dims: [usize; 3],
    pub slice_ptr: Vec<I>, // length dims[0] + 1
    pub fiber_idx: Vec<I>, // level-2 coordinate per fiber
    pub fiber_ptr: Vec<I>, // length nfibers + 1
    pub indices: Vec<I>,   // level-3 coordinate per entry
    pub data: Vec<T>,
}

impl<T, I> Csf<T, I> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> [usize; 3] {
        self.dims
    }
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
    #[inline]
    #[must_use]
    pub fn nfibers(&self) -> usize {
        self.fiber_idx.len()
    }
}

impl Csf<f64, usize> {
    pub fn from_parts(
        dims: [usize; 3],
        slice_ptr: Vec<usize>,
        fiber_idx: Vec<usize>,
        fiber_ptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        let csf = Self::from_parts_unchecked(dims, slice_ptr, fiber_idx, fiber_ptr, indices, data);
        let checked = if check {
            csf.validate()
        } else {
            csf.validate_structure()
        };
        checked.map_err(|v| Error::invalid("csf", v))?;
        Ok(csf)
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        dims: [usize; 3],
        slice_ptr: Vec<usize>,
        fiber_idx: Vec<usize>,
        fiber_ptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            dims,
            slice_ptr,
            fiber_idx,
            fiber_ptr,
            indices,
            data,
        }
    }

    /// Drop every fiber and entry. The slice pointer is zeroed, the fiber
    /// pointer shrinks back to its leading 0.
    pub fn reset(&mut self) {
        self.slice_ptr.fill(0);
        self.fiber_idx.clear();
        self.fiber_ptr.clear();
        self.fiber_ptr.push(0);
        self.indices.clear();
        self.data.clear();
    }

    /// Level 2: fibers of slice `i`.
    #[inline]
    #[must_use]
    pub fn fibers(&self) -> Compressed<'_> {
        Compressed::new(&self.slice_ptr, &self.fiber_idx)
    }

    /// Level 3: entries of fiber `f` (a position in level 2).
    #[inline]
    #[must_use]
    pub fn entries(&self) -> Compressed<'_> {
        Compressed::new(&self.fiber_ptr, &self.indices)
    }
}

impl Tensor for Csf<f64, usize> {
    const FORMAT: Format = Format::Csf;

    fn nnz(&self) -> usize {
        self.data.len()
    }
}
