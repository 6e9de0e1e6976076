//! Kernel keys: the full format selection of one kernel call.
//!
//! A key fixes the operation, the output format, the format of every operand
//! and, for hadamard-transpose, the search order. Its textual form is
//! `op:out:b:c[:d][:search_b|search_c]`, e.g.
//! `hadamard_transpose:csr:csr:coo:search_c`.

use crate::error::Error;
use crate::search::SearchOrder;
use core::fmt;
use core::str::FromStr;
use strata_core::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KernelOp {
    /// `A(i,j) = B(i,j) * C(j,i)`
    HadamardTranspose,
    /// `A(i,j) = sum_k B(i,k) * C(k,j)`
    Matmul,
    /// `A(i,j) = sum_k B(i,k) * C(k,j) * D(k,j)`
    MatmulHadamard,
    /// `y(i) = sum_j B(i,j) * C(j,i)`
    HadamardTransposeReduce,
    /// `y(i) = sum_{j,k} B(i,j,k) * C(i,k,j)`
    PermuteContract,
}

impl KernelOp {
    pub const ALL: [Self; 5] = [
        Self::HadamardTranspose,
        Self::Matmul,
        Self::MatmulHadamard,
        Self::HadamardTransposeReduce,
        Self::PermuteContract,
    ];

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HadamardTranspose => "hadamard_transpose",
            Self::Matmul => "matmul",
            Self::MatmulHadamard => "matmul_hadamard",
            Self::HadamardTransposeReduce => "hadamard_transpose_reduce",
            Self::PermuteContract => "permute_contract",
        }
    }

    /// Number of input operands.
    #[inline]
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::MatmulHadamard => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for KernelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == tag)
            .ok_or_else(|| Error::ParseKey(format!("unknown operation '{tag}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelKey {
    pub op: KernelOp,
    pub output: Format,
    pub b: Format,
    pub c: Format,
    pub d: Option<Format>,
    pub order: Option<SearchOrder>,
}

impl KernelKey {
    #[must_use]
    pub const fn hadamard_transpose(
        output: Format,
        b: Format,
        c: Format,
        order: SearchOrder,
    ) -> Self {
        Self {
            op: KernelOp::HadamardTranspose,
            output,
            b,
            c,
            d: None,
            order: Some(order),
        }
    }

    #[must_use]
    pub const fn matmul(output: Format, b: Format, c: Format) -> Self {
        Self {
            op: KernelOp::Matmul,
            output,
            b,
            c,
            d: None,
            order: None,
        }
    }

    #[must_use]
    pub const fn matmul_hadamard(output: Format, b: Format, c: Format, d: Format) -> Self {
        Self {
            op: KernelOp::MatmulHadamard,
            output,
            b,
            c,
            d: Some(d),
            order: None,
        }
    }

    /// The reduction always writes a dense vector.
    #[must_use]
    pub const fn hadamard_transpose_reduce(b: Format, c: Format) -> Self {
        Self {
            op: KernelOp::HadamardTransposeReduce,
            output: Format::Dense,
            b,
            c,
            d: None,
            order: None,
        }
    }

    #[must_use]
    pub const fn permute_contract(b: Format, c: Format) -> Self {
        Self {
            op: KernelOp::PermuteContract,
            output: Format::Dense,
            b,
            c,
            d: None,
            order: None,
        }
    }

    /// Operand formats in role order (B, C, then D when present).
    pub fn operands(&self) -> impl Iterator<Item = Format> {
        [Some(self.b), Some(self.c), self.d].into_iter().flatten()
    }

    /// Whether a kernel for this key is supported.
    ///
    /// A compressed output is filled in outer-index order, so the driving
    /// operand must enumerate the output's outer index directly (same
    /// orientation, or a coordinate list). Probed operands only need point
    /// lookup. The reductions walk every entry of B and write a dense vector.
    #[must_use]
    pub const fn is_claimed(&self) -> bool {
        let Self {
            op,
            output,
            b,
            c,
            d,
            order,
        } = *self;
        match op {
            KernelOp::HadamardTranspose => {
                let Some(order) = order else {
                    return false;
                };
                if d.is_some() || !output.is_compressed_output() {
                    return false;
                }
                match (output, order) {
                    (Format::Csr, SearchOrder::SearchC) => b.scans_rows() && c.supports_lookup(),
                    (Format::Csc, SearchOrder::SearchC) => b.scans_cols() && c.supports_lookup(),
                    (Format::Csr, SearchOrder::SearchB) => c.scans_cols() && b.supports_lookup(),
                    (Format::Csc, SearchOrder::SearchB) => c.scans_rows() && b.supports_lookup(),
                    _ => false,
                }
            }
            KernelOp::Matmul | KernelOp::MatmulHadamard => {
                if order.is_some() {
                    return false;
                }
                let third = match (op, d) {
                    (KernelOp::Matmul, None) => true,
                    (KernelOp::MatmulHadamard, Some(d)) => d.supports_lookup(),
                    _ => false,
                };
                third
                    && output.is_compressed_output()
                    && match output {
                        Format::Csr => b.scans_rows() && c.scans_rows(),
                        _ => b.scans_cols() && c.scans_cols(),
                    }
            }
            KernelOp::HadamardTransposeReduce => {
                matches!(output, Format::Dense)
                    && d.is_none()
                    && order.is_none()
                    && b.supports_lookup()
                    && c.supports_lookup()
            }
            KernelOp::PermuteContract => {
                matches!(output, Format::Dense)
                    && matches!(b, Format::Csf)
                    && matches!(c, Format::Csf)
                    && d.is_none()
                    && order.is_none()
            }
        }
    }

    /// Every syntactically possible key: each operation with every output,
    /// operand and search-order choice, supported or not.
    pub fn universe() -> impl Iterator<Item = Self> {
        KernelOp::ALL.into_iter().flat_map(|op| {
            Format::ALL.into_iter().flat_map(move |output| {
                Format::ALL.into_iter().flat_map(move |b| {
                    Format::ALL.into_iter().flat_map(move |c| {
                        THIRD_OPERANDS.into_iter().flat_map(move |d| {
                            ORDERS.into_iter().map(move |order| Self {
                                op,
                                output,
                                b,
                                c,
                                d,
                                order,
                            })
                        })
                    })
                })
            })
        })
    }
}

const THIRD_OPERANDS: [Option<Format>; 6] = [
    None,
    Some(Format::Dense),
    Some(Format::Csr),
    Some(Format::Csc),
    Some(Format::Coo),
    Some(Format::Csf),
];

const ORDERS: [Option<SearchOrder>; 3] = [
    None,
    Some(SearchOrder::SearchB),
    Some(SearchOrder::SearchC),
];

impl fmt::Display for KernelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.op, self.output, self.b, self.c)?;
        if let Some(d) = self.d {
            write!(f, ":{d}")?;
        }
        if let Some(order) = self.order {
            write!(f, ":{order}")?;
        }
        Ok(())
    }
}

fn parse_format(tag: &str) -> Result<Format, Error> {
    tag.parse::<Format>()
        .map_err(|e| Error::ParseKey(e.to_string()))
}

impl FromStr for KernelKey {
    type Err = Error;

    /// Parses `op:out:b:c[:d][:search_b|search_c]`. Whether the key is
    /// supported is decided at resolution, not here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(Error::ParseKey(format!(
                "'{s}' has {} fields, expected 4 to 6",
                parts.len()
            )));
        }
        let mut key = Self {
            op: parts[0].parse()?,
            output: parse_format(parts[1])?,
            b: parse_format(parts[2])?,
            c: parse_format(parts[3])?,
            d: None,
            order: None,
        };
        for tail in &parts[4..] {
            if key.order.is_some() {
                return Err(Error::ParseKey(format!(
                    "'{s}': search order must be the last field"
                )));
            }
            if let Ok(order) = tail.parse::<SearchOrder>() {
                key.order = Some(order);
            } else if key.d.is_none() {
                key.d = Some(parse_format(tail)?);
            } else {
                return Err(Error::ParseKey(format!(
                    "'{s}': unexpected field '{tail}'"
                )));
            }
        }
        Ok(key)
    }
}
