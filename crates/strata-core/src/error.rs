//! Error types for strata-core
//!
//! Kernels report capacity exhaustion and shape mismatches through [`Error`];
//! the validation pass reports broken layout invariants as a structured
//! [`Violation`] naming the format, the storage level and the offending index.

use crate::format::Format;
use thiserror::Error;

/// Result type alias using strata-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by tensor construction, validation and kernel execution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The output would need more non-zeros than it was allocated for.
    #[error("Capacity exceeded: {format} output holds at most {capacity} non-zeros")]
    CapacityExceeded {
        /// Format of the output tensor
        format: Format,
        /// Allocated non-zero capacity
        capacity: usize,
    },

    /// Operand or output dimensions do not fit the operation
    #[error("Shape mismatch in {op}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// The operation name
        op: &'static str,
        /// Expected dimensions
        expected: Vec<usize>,
        /// Actual dimensions
        got: Vec<usize>,
    },

    /// A tensor breaks one of its layout invariants
    #[error("Invalid tensor {tensor}: {violation}")]
    InvalidTensor {
        /// Role or name of the offending tensor
        tensor: String,
        /// What was broken, and where
        violation: Violation,
    },
}

impl Error {
    /// Attach a tensor name to a violation found by the validation pass.
    pub fn invalid(tensor: impl Into<String>, violation: Violation) -> Self {
        Self::InvalidTensor {
            tensor: tensor.into(),
            violation,
        }
    }

    pub fn shape(op: &'static str, expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}

/// Location and nature of a broken layout invariant.
///
/// Levels are numbered from 1 (outermost). For CSR/CSC the compressed level is
/// level 2; for COO the two coordinate arrays are levels 1 and 2; for CSF the
/// fiber and entry levels are 2 and 3. `index` is the outer index whose range
/// is broken, or the array position for flat checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{format} level {level}, index {index}: {kind}")]
pub struct Violation {
    pub format: Format,
    pub level: usize,
    pub index: usize,
    pub kind: ViolationKind,
}

impl Violation {
    #[inline]
    #[must_use]
    pub const fn new(format: Format, level: usize, index: usize, kind: ViolationKind) -> Self {
        Self {
            format,
            level,
            index,
            kind,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    #[error("{array} has length {actual}, expected {expected}")]
    LengthMismatch {
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("position array starts at {found}, expected 0")]
    PositionStart { found: usize },

    #[error("position array decreases from {prev} to {next}")]
    PositionDecreasing { prev: usize, next: usize },

    #[error("position array ends at {found}, expected {expected}")]
    PositionEnd { expected: usize, found: usize },

    #[error("coordinate {coord} out of bounds for dimension of size {bound}")]
    CoordinateOutOfBounds { coord: usize, bound: usize },

    #[error("coordinates must be strictly increasing, found {prev} then {next}")]
    Unsorted { prev: usize, next: usize },

    #[error("duplicate coordinate ({row}, {col})")]
    DuplicateCoordinate { row: usize, col: usize },
}
