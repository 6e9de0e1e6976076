//! Error types for strata-kernels

use crate::key::KernelKey;
use strata_core::Format;
use thiserror::Error;

/// Result type alias using strata-kernels' Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Capacity, shape or invariant failure raised by a kernel or a check
    #[error(transparent)]
    Core(#[from] strata_core::Error),

    /// No registered kernel serves this format combination
    #[error("No kernel registered for {0}")]
    Unresolved(KernelKey),

    /// An operand's format differs from the one the plan was resolved for
    #[error("Operand {role} has format {found}, plan expects {expected}")]
    FormatMismatch {
        role: &'static str,
        expected: Format,
        found: Format,
    },

    #[error("Plan expects {expected} operands, got {found}")]
    Arity { expected: usize, found: usize },

    /// The kernel table disagrees with the capability rules
    #[error("Kernel registry is inconsistent: {0}")]
    Registry(String),

    #[error("Invalid kernel key: {0}")]
    ParseKey(String),
}

/// Fail with a shape mismatch unless `got == expected`.
pub(crate) fn check_shape(op: &'static str, expected: &[usize], got: &[usize]) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(strata_core::Error::shape(op, expected, got).into())
    }
}
