//! Core data structures and traits for strata (pure Rust)
//!
//! Sparse tensors are described level by level: a dense level walks every
//! index, a compressed level bounds each outer index's coordinates with a
//! position array, and a coordinate level lists coordinates with no index
//! structure. The formats here are fixed compositions of those levels:
//!
//! - [`Dense`]: a 1D vector.
//! - [`Csr`] / [`Csc`]: a dense outer level over a compressed inner level.
//! - [`Coo`]: two coordinate levels, unordered.
//! - [`Csf`]: a 3-way tensor, dense over compressed over compressed.
//!
//! Kernels consume them through the access traits in [`level`] and fill
//! compressed outputs through [`LevelWriter`].

pub mod accumulator;
pub mod coo;
pub mod csc;
pub mod csf;
pub mod csr;
pub mod dense;
pub mod error;
pub mod format;
pub mod level;
pub mod validate;

pub use accumulator::DenseAccumulator;
pub use coo::Coo;
pub use csc::Csc;
pub use csf::Csf;
pub use csr::Csr;
pub use dense::Dense;
pub use error::{Error, Result, Violation, ViolationKind};
pub use format::{Format, Operand, ParseFormatError, Tensor, TensorMut, TensorRef};
pub use level::{
    dense_walk, ColScan, Compressed, Coordinates, Entries, LevelWriter, Matrix, PointLookup,
    RowScan,
};
pub use validate::Validate;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
