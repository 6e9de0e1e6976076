//! Search order of the hadamard-transpose kernels, as a value and as a type.

use core::fmt;
use core::str::FromStr;

/// Which operand of `B(i,j) * C(j,i)` is probed by point lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchOrder {
    /// Drive C along the output's outer index, probe B.
    SearchB,
    /// Drive B along the output's outer index, probe C.
    SearchC,
}

impl SearchOrder {
    pub const ALL: [Self; 2] = [Self::SearchB, Self::SearchC];

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchB => "search_b",
            Self::SearchC => "search_c",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchOrder {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.name() == tag)
            .ok_or_else(|| crate::Error::ParseKey(format!("unknown search order '{tag}'")))
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::SearchB {}
    impl Sealed for super::SearchC {}
}

/// Type-level search order, used as a generic parameter of the typed kernels.
pub trait SearchStrategy: sealed::Sealed {
    const ORDER: SearchOrder;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchB;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchC;

impl SearchStrategy for SearchB {
    const ORDER: SearchOrder = SearchOrder::SearchB;
}

impl SearchStrategy for SearchC {
    const ORDER: SearchOrder = SearchOrder::SearchC;
}
