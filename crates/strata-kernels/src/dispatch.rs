//! Runtime kernel selection over type-erased tensors.
//!
//! [`registry`] is a static table mapping every supported [`KernelKey`] to a
//! monomorphized instance of the typed kernels. [`Dispatcher::new`] checks the
//! table against [`KernelKey::is_claimed`] before anything can be resolved: a
//! missing, duplicated or unclaimed entry is an [`Error::Registry`], never an
//! empty result at call time.

use crate::error::{Error, Result};
use crate::hadamard_transpose::HadamardTranspose;
use crate::key::KernelKey;
use crate::matmul::{Matmul, MatmulHadamard};
use crate::reduce::{HadamardTransposeReduce, PermuteContract};
use crate::search::{SearchB, SearchC, SearchStrategy};
use log::{debug, trace, warn};
use std::collections::HashMap;
use strata_core::{Format, Operand, TensorMut, TensorRef};

type Dense = strata_core::Dense<f64>;
type Csr = strata_core::Csr<f64, usize>;
type Csc = strata_core::Csc<f64, usize>;
type Coo = strata_core::Coo<f64, usize>;
type Csf = strata_core::Csf<f64, usize>;

/// Type-erased kernel entry point. Operands are passed in role order.
pub type KernelFn = for<'a, 'b, 'c> fn(TensorMut<'a>, &'b [TensorRef<'c>]) -> Result<()>;

/// Operand role names, in the order operands are passed.
const ROLES: [&str; 3] = ["B", "C", "D"];

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub key: KernelKey,
    pub run: KernelFn,
}

fn output<'a, T: Operand>(out: TensorMut<'a>) -> Result<&'a mut T> {
    let found = out.format();
    T::from_mut(out).ok_or(Error::FormatMismatch {
        role: "A",
        expected: T::FORMAT,
        found,
    })
}

fn operand<'a, T: Operand>(ops: &[TensorRef<'a>], idx: usize) -> Result<&'a T> {
    let view = ops.get(idx).copied().ok_or(Error::Arity {
        expected: idx + 1,
        found: ops.len(),
    })?;
    T::from_ref(view).ok_or(Error::FormatMismatch {
        role: ROLES[idx],
        expected: T::FORMAT,
        found: view.format(),
    })
}

fn run_ht<S, A, B, C>(out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()>
where
    S: SearchStrategy,
    A: Operand + HadamardTranspose<B, C, S>,
    B: Operand,
    C: Operand,
{
    output::<A>(out)?.hadamard_transpose(operand::<B>(ops, 0)?, operand::<C>(ops, 1)?)
}

fn run_mm<A, B, C>(out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()>
where
    A: Operand + Matmul<B, C>,
    B: Operand,
    C: Operand,
{
    output::<A>(out)?.matmul(operand::<B>(ops, 0)?, operand::<C>(ops, 1)?)
}

fn run_mmh<A, B, C, D>(out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()>
where
    A: Operand + MatmulHadamard<B, C, D>,
    B: Operand,
    C: Operand,
    D: Operand,
{
    output::<A>(out)?.matmul_hadamard(
        operand::<B>(ops, 0)?,
        operand::<C>(ops, 1)?,
        operand::<D>(ops, 2)?,
    )
}

fn run_htr<B, C>(out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()>
where
    Dense: HadamardTransposeReduce<B, C>,
    B: Operand,
    C: Operand,
{
    output::<Dense>(out)?.hadamard_transpose_reduce(operand::<B>(ops, 0)?, operand::<C>(ops, 1)?)
}

fn run_pc<B, C>(out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()>
where
    Dense: PermuteContract<B, C>,
    B: Operand,
    C: Operand,
{
    output::<Dense>(out)?.permute_contract(operand::<B>(ops, 0)?, operand::<C>(ops, 1)?)
}

macro_rules! ht {
    ($a:ident, $s:ident, $b:ident, $c:ident) => {
        Entry {
            key: KernelKey::hadamard_transpose(
                Format::$a,
                Format::$b,
                Format::$c,
                <$s as SearchStrategy>::ORDER,
            ),
            run: run_ht::<$s, $a, $b, $c>,
        }
    };
}

macro_rules! mm {
    ($a:ident, $b:ident, $c:ident) => {
        Entry {
            key: KernelKey::matmul(Format::$a, Format::$b, Format::$c),
            run: run_mm::<$a, $b, $c>,
        }
    };
}

macro_rules! mmh {
    ($a:ident, $b:ident, $c:ident, $d:ident) => {
        Entry {
            key: KernelKey::matmul_hadamard(Format::$a, Format::$b, Format::$c, Format::$d),
            run: run_mmh::<$a, $b, $c, $d>,
        }
    };
}

macro_rules! htr {
    ($b:ident, $c:ident) => {
        Entry {
            key: KernelKey::hadamard_transpose_reduce(Format::$b, Format::$c),
            run: run_htr::<$b, $c>,
        }
    };
}

static REGISTRY: &[Entry] = &[
    // hadamard-transpose, CSR output, B drives by row
    ht!(Csr, SearchC, Csr, Csr),
    ht!(Csr, SearchC, Csr, Csc),
    ht!(Csr, SearchC, Csr, Coo),
    ht!(Csr, SearchC, Coo, Csr),
    ht!(Csr, SearchC, Coo, Csc),
    ht!(Csr, SearchC, Coo, Coo),
    // CSC output, B drives by column
    ht!(Csc, SearchC, Csc, Csr),
    ht!(Csc, SearchC, Csc, Csc),
    ht!(Csc, SearchC, Csc, Coo),
    ht!(Csc, SearchC, Coo, Csr),
    ht!(Csc, SearchC, Coo, Csc),
    ht!(Csc, SearchC, Coo, Coo),
    // CSR output, C drives by column
    ht!(Csr, SearchB, Csr, Csc),
    ht!(Csr, SearchB, Csc, Csc),
    ht!(Csr, SearchB, Coo, Csc),
    ht!(Csr, SearchB, Csr, Coo),
    ht!(Csr, SearchB, Csc, Coo),
    ht!(Csr, SearchB, Coo, Coo),
    // CSC output, C drives by row
    ht!(Csc, SearchB, Csr, Csr),
    ht!(Csc, SearchB, Csc, Csr),
    ht!(Csc, SearchB, Coo, Csr),
    ht!(Csc, SearchB, Csr, Coo),
    ht!(Csc, SearchB, Csc, Coo),
    ht!(Csc, SearchB, Coo, Coo),
    // matmul
    mm!(Csr, Csr, Csr),
    mm!(Csr, Csr, Coo),
    mm!(Csr, Coo, Csr),
    mm!(Csr, Coo, Coo),
    mm!(Csc, Csc, Csc),
    mm!(Csc, Csc, Coo),
    mm!(Csc, Coo, Csc),
    mm!(Csc, Coo, Coo),
    // matmul-hadamard
    mmh!(Csr, Csr, Csr, Csr),
    mmh!(Csr, Csr, Csr, Csc),
    mmh!(Csr, Csr, Csr, Coo),
    mmh!(Csr, Csr, Coo, Csr),
    mmh!(Csr, Csr, Coo, Csc),
    mmh!(Csr, Csr, Coo, Coo),
    mmh!(Csr, Coo, Csr, Csr),
    mmh!(Csr, Coo, Csr, Csc),
    mmh!(Csr, Coo, Csr, Coo),
    mmh!(Csr, Coo, Coo, Csr),
    mmh!(Csr, Coo, Coo, Csc),
    mmh!(Csr, Coo, Coo, Coo),
    mmh!(Csc, Csc, Csc, Csr),
    mmh!(Csc, Csc, Csc, Csc),
    mmh!(Csc, Csc, Csc, Coo),
    mmh!(Csc, Csc, Coo, Csr),
    mmh!(Csc, Csc, Coo, Csc),
    mmh!(Csc, Csc, Coo, Coo),
    mmh!(Csc, Coo, Csc, Csr),
    mmh!(Csc, Coo, Csc, Csc),
    mmh!(Csc, Coo, Csc, Coo),
    mmh!(Csc, Coo, Coo, Csr),
    mmh!(Csc, Coo, Coo, Csc),
    mmh!(Csc, Coo, Coo, Coo),
    // hadamard-transpose-reduce
    htr!(Csr, Csr),
    htr!(Csr, Csc),
    htr!(Csr, Coo),
    htr!(Csc, Csr),
    htr!(Csc, Csc),
    htr!(Csc, Coo),
    htr!(Coo, Csr),
    htr!(Coo, Csc),
    htr!(Coo, Coo),
    // permuted contraction
    Entry {
        key: KernelKey::permute_contract(Format::Csf, Format::Csf),
        run: run_pc::<Csf, Csf>,
    },
];

/// The built-in kernel table.
#[must_use]
pub fn registry() -> &'static [Entry] {
    REGISTRY
}

/// Per-call switches for [`Plan::execute_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Run the full invariant pass on every input before the kernel.
    pub validate: bool,
    /// Reset the output before the kernel writes into it.
    pub reset_output: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            validate: false,
            reset_output: true,
        }
    }
}

impl ExecOptions {
    #[must_use]
    pub const fn validate(mut self, on: bool) -> Self {
        self.validate = on;
        self
    }

    #[must_use]
    pub const fn reset_output(mut self, on: bool) -> Self {
        self.reset_output = on;
        self
    }
}

/// Validated lookup table from keys to kernels.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: HashMap<KernelKey, KernelFn>,
}

impl Dispatcher {
    /// Dispatcher over the built-in table.
    pub fn new() -> Result<Self> {
        Self::with_registry(REGISTRY)
    }

    /// Build a dispatcher from `entries`, which must contain every claimed
    /// key exactly once and nothing else.
    pub fn with_registry(entries: &[Entry]) -> Result<Self> {
        let mut table = HashMap::with_capacity(entries.len());
        for entry in entries {
            if !entry.key.is_claimed() {
                return Err(Error::Registry(format!(
                    "{} is registered but not supported",
                    entry.key
                )));
            }
            if table.insert(entry.key, entry.run).is_some() {
                return Err(Error::Registry(format!(
                    "{} is registered more than once",
                    entry.key
                )));
            }
        }
        let missing: Vec<String> = KernelKey::universe()
            .filter(|k| k.is_claimed() && !table.contains_key(k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Registry(format!(
                "no kernel for {}",
                missing.join(", ")
            )));
        }
        debug!("kernel registry validated: {} entries", table.len());
        Ok(Self { table })
    }

    /// Plan for `key`, or [`Error::Unresolved`] if no kernel serves it.
    pub fn resolve(&self, key: KernelKey) -> Result<Plan> {
        match self.table.get(&key) {
            Some(&run) => {
                debug!("resolved {key}");
                Ok(Plan { key, run })
            }
            None => {
                debug!("no kernel for {key}");
                Err(Error::Unresolved(key))
            }
        }
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &KernelKey> {
        self.table.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A resolved kernel, bound to the formats of its key.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    key: KernelKey,
    run: KernelFn,
}

impl Plan {
    #[must_use]
    pub const fn key(&self) -> KernelKey {
        self.key
    }

    /// Run with the default options: no validation, output reset first.
    pub fn execute(&self, out: TensorMut<'_>, ops: &[TensorRef<'_>]) -> Result<()> {
        self.execute_with(&ExecOptions::default(), out, ops)
    }

    /// Check the output and operand formats against the key, then run the
    /// kernel. Operands are passed in role order: B, C, then D.
    pub fn execute_with(
        &self,
        opts: &ExecOptions,
        mut out: TensorMut<'_>,
        ops: &[TensorRef<'_>],
    ) -> Result<()> {
        let key = self.key;
        let arity = key.op.arity();
        if ops.len() != arity {
            return Err(Error::Arity {
                expected: arity,
                found: ops.len(),
            });
        }
        if out.format() != key.output {
            return Err(Error::FormatMismatch {
                role: "A",
                expected: key.output,
                found: out.format(),
            });
        }
        for ((role, expected), op) in ROLES.into_iter().zip(key.operands()).zip(ops) {
            if op.format() != expected {
                return Err(Error::FormatMismatch {
                    role,
                    expected,
                    found: op.format(),
                });
            }
        }

        if opts.validate {
            for (role, op) in ROLES.into_iter().zip(ops) {
                if let Err(violation) = op.validate() {
                    warn!("{key}: operand {role} rejected: {violation}");
                    return Err(strata_core::Error::invalid(role, violation).into());
                }
            }
        }

        trace!(
            "{key}: output nnz {} before run, operand nnz {:?}",
            out.nnz(),
            ops.iter().map(|op| op.nnz()).collect::<Vec<_>>()
        );
        if opts.reset_output {
            out.reset();
        }
        (self.run)(out, ops)
    }
}
