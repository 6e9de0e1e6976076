//! Opt-in invariant checks.
//!
//! Kernels assume sorted, in-bounds, duplicate-free coordinates and well-formed
//! position arrays but never verify them. [`Validate::validate`] checks all of
//! it and reports the first violation as a [`Violation`] naming the level and
//! index; [`Validate::validate_structure`] is the cheap subset (array lengths
//! and position endpoints) that every `from_parts` constructor always runs.
//!
//! With the `parallel` feature, per-outer-index range checks of large tensors
//! run on rayon; the reported violation is still the one with the lowest outer
//! index. Both paths emit a `trace!` record naming the level being checked.

use crate::coo::Coo;
use crate::csc::Csc;
use crate::csf::Csf;
use crate::csr::Csr;
use crate::dense::Dense;
use crate::error::{Violation, ViolationKind};
use crate::format::Format;
use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many stored coordinates range checks stay on the calling thread.
pub const PAR_CHECK_LIMIT: usize = 32 * 1024;

pub trait Validate {
    /// Array lengths agree and every position array starts at 0 and ends at
    /// the entry count of the level it bounds.
    fn validate_structure(&self) -> Result<(), Violation>;

    /// Everything in [`Self::validate_structure`], plus monotone position
    /// arrays and coordinates that are in bounds and strictly increasing within
    /// each outer index (unique, for coordinate lists).
    fn validate(&self) -> Result<(), Violation>;
}

fn check_len(
    format: Format,
    level: usize,
    array: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), Violation> {
    if expected == actual {
        return Ok(());
    }
    Err(Violation::new(
        format,
        level,
        0,
        ViolationKind::LengthMismatch {
            array,
            expected,
            actual,
        },
    ))
}

/// `pos` has `outer + 1` entries, starts at 0 and ends at `nnz`.
fn check_endpoints(
    format: Format,
    level: usize,
    array: &'static str,
    pos: &[usize],
    outer: usize,
    nnz: usize,
) -> Result<(), Violation> {
    check_len(format, level, array, outer + 1, pos.len())?;
    let first = pos[0];
    if first != 0 {
        return Err(Violation::new(
            format,
            level,
            0,
            ViolationKind::PositionStart { found: first },
        ));
    }
    let last = pos[outer];
    if last != nnz {
        return Err(Violation::new(
            format,
            level,
            outer,
            ViolationKind::PositionEnd {
                expected: nnz,
                found: last,
            },
        ));
    }
    Ok(())
}

fn check_monotone(format: Format, level: usize, pos: &[usize]) -> Result<(), Violation> {
    match pos.windows(2).position(|w| w[0] > w[1]) {
        None => Ok(()),
        Some(i) => Err(Violation::new(
            format,
            level,
            i,
            ViolationKind::PositionDecreasing {
                prev: pos[i],
                next: pos[i + 1],
            },
        )),
    }
}

/// Coordinates of outer index `i` are `< bound` and strictly increasing.
fn check_range(
    format: Format,
    level: usize,
    pos: &[usize],
    crd: &[usize],
    bound: usize,
    i: usize,
) -> Option<Violation> {
    let mut prev: Option<usize> = None;
    for &c in &crd[pos[i]..pos[i + 1]] {
        if c >= bound {
            return Some(Violation::new(
                format,
                level,
                i,
                ViolationKind::CoordinateOutOfBounds { coord: c, bound },
            ));
        }
        if let Some(p) = prev {
            if c <= p {
                return Some(Violation::new(
                    format,
                    level,
                    i,
                    ViolationKind::Unsorted { prev: p, next: c },
                ));
            }
        }
        prev = Some(c);
    }
    None
}

/// Full check of one compressed level whose endpoints are already known good.
fn check_compressed(
    format: Format,
    level: usize,
    pos: &[usize],
    crd: &[usize],
    bound: usize,
) -> Result<(), Violation> {
    check_monotone(format, level, pos)?;
    let outer = pos.len() - 1;

    #[cfg(feature = "parallel")]
    if crd.len() >= PAR_CHECK_LIMIT {
        log::trace!("{format} level {level}: parallel range check over {outer} outer indices");
        return match (0..outer)
            .into_par_iter()
            .find_map_first(|i| check_range(format, level, pos, crd, bound, i))
        {
            None => Ok(()),
            Some(v) => Err(v),
        };
    }

    log::trace!("{format} level {level}: range check over {outer} outer indices");
    match (0..outer).find_map(|i| check_range(format, level, pos, crd, bound, i)) {
        None => Ok(()),
        Some(v) => Err(v),
    }
}

impl Validate for Dense<f64> {
    fn validate_structure(&self) -> Result<(), Violation> {
        Ok(())
    }

    fn validate(&self) -> Result<(), Violation> {
        Ok(())
    }
}

impl Validate for Csr<f64, usize> {
    fn validate_structure(&self) -> Result<(), Violation> {
        let nnz = self.indices.len();
        check_len(Format::Csr, 2, "data", nnz, self.data.len())?;
        check_endpoints(Format::Csr, 2, "indptr", &self.indptr, self.nrows, nnz)
    }

    fn validate(&self) -> Result<(), Violation> {
        self.validate_structure()?;
        check_compressed(Format::Csr, 2, &self.indptr, &self.indices, self.ncols)
    }
}

impl Validate for Csc<f64, usize> {
    fn validate_structure(&self) -> Result<(), Violation> {
        let nnz = self.indices.len();
        check_len(Format::Csc, 2, "data", nnz, self.data.len())?;
        check_endpoints(Format::Csc, 2, "indptr", &self.indptr, self.ncols, nnz)
    }

    fn validate(&self) -> Result<(), Violation> {
        self.validate_structure()?;
        check_compressed(Format::Csc, 2, &self.indptr, &self.indices, self.nrows)
    }
}

impl Validate for Coo<f64, usize> {
    fn validate_structure(&self) -> Result<(), Violation> {
        let nnz = self.data.len();
        check_len(Format::Coo, 1, "row", nnz, self.row.len())?;
        check_len(Format::Coo, 2, "col", nnz, self.col.len())
    }

    fn validate(&self) -> Result<(), Violation> {
        self.validate_structure()?;
        let mut seen = HashSet::with_capacity(self.data.len());
        for (p, (&i, &j)) in self.row.iter().zip(&self.col).enumerate() {
            if i >= self.nrows {
                return Err(Violation::new(
                    Format::Coo,
                    1,
                    p,
                    ViolationKind::CoordinateOutOfBounds {
                        coord: i,
                        bound: self.nrows,
                    },
                ));
            }
            if j >= self.ncols {
                return Err(Violation::new(
                    Format::Coo,
                    2,
                    p,
                    ViolationKind::CoordinateOutOfBounds {
                        coord: j,
                        bound: self.ncols,
                    },
                ));
            }
            if !seen.insert((i, j)) {
                return Err(Violation::new(
                    Format::Coo,
                    2,
                    p,
                    ViolationKind::DuplicateCoordinate { row: i, col: j },
                ));
            }
        }
        Ok(())
    }
}

impl Validate for Csf<f64, usize> {
    fn validate_structure(&self) -> Result<(), Violation> {
        let nfibers = self.fiber_idx.len();
        let nnz = self.indices.len();
        check_len(Format::Csf, 3, "data", nnz, self.data.len())?;
        check_endpoints(
            Format::Csf,
            2,
            "slice_ptr",
            &self.slice_ptr,
            self.dims[0],
            nfibers,
        )?;
        check_endpoints(Format::Csf, 3, "fiber_ptr", &self.fiber_ptr, nfibers, nnz)
    }

    fn validate(&self) -> Result<(), Violation> {
        self.validate_structure()?;
        check_compressed(
            Format::Csf,
            2,
            &self.slice_ptr,
            &self.fiber_idx,
            self.dims[1],
        )?;
        check_compressed(Format::Csf, 3, &self.fiber_ptr, &self.indices, self.dims[2])
    }
}
