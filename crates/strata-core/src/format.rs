//! Closed set of storage formats and type-erased tensor views.
//!
//! [`Format`] is the tag every dispatch decision is keyed on. [`TensorRef`]
//! and [`TensorMut`] carry one tensor of any format through the runtime
//! registry; [`Operand`] recovers the concrete type from a view without any
//! runtime type inspection beyond the enum tag.

use crate::coo::Coo;
use crate::csc::Csc;
use crate::csf::Csf;
use crate::csr::Csr;
use crate::dense::Dense;
use crate::error::Violation;
use crate::validate::Validate;
use core::fmt;
use core::str::FromStr;
use thiserror::Error;

/// Storage format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Dense,
    Csr,
    Csc,
    Coo,
    Csf,
}

impl Format {
    /// Every format, in declaration order.
    pub const ALL: [Self; 5] = [Self::Dense, Self::Csr, Self::Csc, Self::Coo, Self::Csf];

    /// Short lowercase tag used in kernel keys.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::Csr => "csr",
            Self::Csc => "csc",
            Self::Coo => "coo",
            Self::Csf => "csf",
        }
    }

    /// Row `i` can be enumerated without touching other rows' storage
    /// (compressed rows, or a filtered coordinate list).
    #[inline]
    #[must_use]
    pub const fn scans_rows(self) -> bool {
        matches!(self, Self::Csr | Self::Coo)
    }

    /// Column `j` can be enumerated; the mirror image of [`Self::scans_rows`].
    #[inline]
    #[must_use]
    pub const fn scans_cols(self) -> bool {
        matches!(self, Self::Csc | Self::Coo)
    }

    /// A single matrix element can be located by coordinate.
    #[inline]
    #[must_use]
    pub const fn supports_lookup(self) -> bool {
        matches!(self, Self::Csr | Self::Csc | Self::Coo)
    }

    /// The format can be filled in by a kernel as a sparse matrix output.
    #[inline]
    #[must_use]
    pub const fn is_compressed_output(self) -> bool {
        matches!(self, Self::Csr | Self::Csc)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown format tag '{0}'")]
pub struct ParseFormatError(pub String);

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == tag)
            .ok_or(ParseFormatError(tag))
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::dense::Dense<f64> {}
    impl Sealed for crate::csr::Csr<f64, usize> {}
    impl Sealed for crate::csc::Csc<f64, usize> {}
    impl Sealed for crate::coo::Coo<f64, usize> {}
    impl Sealed for crate::csf::Csf<f64, usize> {}
}

/// A concrete tensor type with a statically known format.
pub trait Tensor: sealed::Sealed {
    const FORMAT: Format;

    /// Number of stored entries.
    fn nnz(&self) -> usize;
}

/// Shared view of a tensor of any format.
#[derive(Debug, Clone, Copy)]
pub enum TensorRef<'a> {
    Dense(&'a Dense<f64>),
    Csr(&'a Csr<f64, usize>),
    Csc(&'a Csc<f64, usize>),
    Coo(&'a Coo<f64, usize>),
    Csf(&'a Csf<f64, usize>),
}

/// Exclusive view of a tensor of any format, used for kernel outputs.
#[derive(Debug)]
pub enum TensorMut<'a> {
    Dense(&'a mut Dense<f64>),
    Csr(&'a mut Csr<f64, usize>),
    Csc(&'a mut Csc<f64, usize>),
    Coo(&'a mut Coo<f64, usize>),
    Csf(&'a mut Csf<f64, usize>),
}

impl TensorRef<'_> {
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Dense(_) => Format::Dense,
            Self::Csr(_) => Format::Csr,
            Self::Csc(_) => Format::Csc,
            Self::Coo(_) => Format::Coo,
            Self::Csf(_) => Format::Csf,
        }
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        match self {
            Self::Dense(t) => t.nnz(),
            Self::Csr(t) => t.nnz(),
            Self::Csc(t) => t.nnz(),
            Self::Coo(t) => t.nnz(),
            Self::Csf(t) => t.nnz(),
        }
    }

    /// Run the full invariant pass on the viewed tensor.
    pub fn validate(&self) -> Result<(), Violation> {
        match self {
            Self::Dense(t) => t.validate(),
            Self::Csr(t) => t.validate(),
            Self::Csc(t) => t.validate(),
            Self::Coo(t) => t.validate(),
            Self::Csf(t) => t.validate(),
        }
    }
}

impl TensorMut<'_> {
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Dense(_) => Format::Dense,
            Self::Csr(_) => Format::Csr,
            Self::Csc(_) => Format::Csc,
            Self::Coo(_) => Format::Coo,
            Self::Csf(_) => Format::Csf,
        }
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        match self {
            Self::Dense(t) => t.nnz(),
            Self::Csr(t) => t.nnz(),
            Self::Csc(t) => t.nnz(),
            Self::Coo(t) => t.nnz(),
            Self::Csf(t) => t.nnz(),
        }
    }

    /// Zero counters and position arrays so a kernel can fill the tensor.
    pub fn reset(&mut self) {
        match self {
            Self::Dense(t) => t.reset(),
            Self::Csr(t) => t.reset(),
            Self::Csc(t) => t.reset(),
            Self::Coo(t) => t.reset(),
            Self::Csf(t) => t.reset(),
        }
    }
}

/// Recover a concrete tensor from a type-erased view.
///
/// Returns `None` when the view carries a different format.
pub trait Operand: Tensor + Sized {
    fn from_ref<'a>(view: TensorRef<'a>) -> Option<&'a Self>;
    fn from_mut<'a>(view: TensorMut<'a>) -> Option<&'a mut Self>;
}

macro_rules! impl_views {
    ($variant:ident, $ty:ty) => {
        impl<'a> From<&'a $ty> for TensorRef<'a> {
            #[inline]
            fn from(t: &'a $ty) -> Self {
                Self::$variant(t)
            }
        }

        impl<'a> From<&'a mut $ty> for TensorMut<'a> {
            #[inline]
            fn from(t: &'a mut $ty) -> Self {
                Self::$variant(t)
            }
        }

        impl Operand for $ty {
            #[inline]
            fn from_ref<'a>(view: TensorRef<'a>) -> Option<&'a Self> {
                match view {
                    TensorRef::$variant(t) => Some(t),
                    _ => None,
                }
            }

            #[inline]
            fn from_mut<'a>(view: TensorMut<'a>) -> Option<&'a mut Self> {
                match view {
                    TensorMut::$variant(t) => Some(t),
                    _ => None,
                }
            }
        }
    };
}

impl_views!(Dense, Dense<f64>);
impl_views!(Csr, Csr<f64, usize>);
impl_views!(Csc, Csc<f64, usize>);
impl_views!(Coo, Coo<f64, usize>);
impl_views!(Csf, Csf<f64, usize>);
