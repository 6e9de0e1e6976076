//! Dense scratch accumulator for gather-then-compress kernels.
//
// Each cell carries the epoch that last touched it, so moving to the next
// outer index is O(1): cells from older epochs read as untouched without the
// buffer being cleared.

use crate::error::Result;
use crate::level::LevelWriter;

/// Scratch values sized to the output's inner dimension, plus per-cell epoch
/// markers. Owned by a single kernel call and dropped on return.
#[derive(Debug, Clone)]
pub struct DenseAccumulator {
    vals: Vec<f64>,
    marks: Vec<usize>,
    epoch: usize,
}

impl DenseAccumulator {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            vals: vec![0.0; width],
            marks: vec![0; width],
            epoch: 0,
        }
    }

    /// Start accumulating for outer index `outer`.
    #[inline]
    pub fn begin(&mut self, outer: usize) {
        // epoch 0 is reserved for cells never touched
        self.epoch = outer + 1;
    }

    #[inline]
    pub fn add(&mut self, idx: usize, val: f64) {
        self.marks[idx] = self.epoch;
        self.vals[idx] += val;
    }

    /// Sweep the full width once, pushing every cell touched in the current
    /// epoch whose sum is non-zero, and clear the emitted cells.
    ///
    /// Touched cells that summed to zero are skipped; their value is already
    /// zero so they need no clearing.
    pub fn drain<W: LevelWriter>(&mut self, out: &mut W) -> Result<()> {
        for idx in 0..self.vals.len() {
            if self.marks[idx] != self.epoch {
                continue;
            }
            let v = self.vals[idx];
            if v != 0.0 {
                out.push(idx, v)?;
                self.vals[idx] = 0.0;
            }
        }
        Ok(())
    }
}
