//! Fused sparse kernels for strata (pure Rust)
//!
//! Every kernel is generic over the access traits of `strata-core` and is
//! implemented on its output type only for the format combinations it
//! supports, so the typed API rejects anything else at compile time:
//!
//! ```
//! use strata_core::{Coo, Csr};
//! use strata_kernels::{hadamard_transpose, SearchC};
//!
//! // B = [[1, 2], [0, 3]] as CSR, C = [[4, 0], [5, 6]] as COO
//! let b = Csr::from_parts(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0], true)?;
//! let c = Coo::from_parts(2, 2, vec![0, 1, 1], vec![0, 0, 1], vec![4.0, 5.0, 6.0], true)?;
//! let mut a = Csr::allocate(2, 2, 4);
//! hadamard_transpose::<SearchC, _, _, _>(&mut a, &b, &c)?;
//! assert_eq!(a.indptr, vec![0, 2, 3]);
//! assert_eq!(a.indices, vec![0, 1, 1]);
//! assert_eq!(a.data, vec![4.0, 10.0, 18.0]);
//! # Ok::<(), strata_kernels::Error>(())
//! ```
//!
//! [`Dispatcher`] covers the same kernels at runtime, keyed by [`KernelKey`]
//! over type-erased tensor views.

pub mod dispatch;
pub mod error;
pub mod hadamard_transpose;
pub mod key;
pub mod matmul;
pub mod reduce;
pub mod search;

pub use dispatch::{registry, Dispatcher, Entry, ExecOptions, KernelFn, Plan};
pub use error::{Error, Result};
pub use hadamard_transpose::{hadamard_transpose, HadamardTranspose};
pub use key::{KernelKey, KernelOp};
pub use matmul::{matmul, matmul_hadamard, Matmul, MatmulHadamard};
pub use reduce::{
    hadamard_transpose_reduce, permute_contract, HadamardTransposeReduce, PermuteContract,
};
pub use search::{SearchB, SearchC, SearchOrder, SearchStrategy};
