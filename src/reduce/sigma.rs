use crate::error::{ReproError, Result};
use crate::grid::{Cell, Grid};
use crate::reduce::{reduce_cells, SubjectRepetitions};
use crate::stats;

/// One cell's values across a subject's repetitions
#[derive(Debug, Clone, PartialEq)]
pub struct PointSample {
    pub row: usize,
    pub col: usize,
    /// Value per repetition, in repetition order; `None` where missing
    pub values: Vec<Cell>,
    /// Number of defined values (M)
    pub defined: usize,
    /// Mean of the defined values
    pub mean: Cell,
    /// Sample standard deviation; `None` when M < 2
    pub sigma: Cell,
}

impl PointSample {
    pub(crate) fn new(row: usize, col: usize, values: Vec<Cell>) -> Self {
        let defined: Vec<f64> = values.iter().filter_map(|v| *v).collect();
        Self {
            row,
            col,
            defined: defined.len(),
            mean: stats::mean(&defined),
            sigma: stats::sample_std_dev(&defined),
            values,
        }
    }
}

impl SubjectRepetitions {
    /// Sample standard deviation at one cell across repetitions
    ///
    /// `None` when fewer than two repetitions are defined there, never zero
    /// as a stand-in.
    pub fn point_sigma(&self, row: usize, col: usize) -> Result<Cell> {
        Ok(self.point_sample(row, col)?.sigma)
    }

    /// Every repetition's value at one cell plus the local statistics
    pub fn point_sample(&self, row: usize, col: usize) -> Result<PointSample> {
        let shape = self.shape();
        if !shape.contains(row, col) {
            return Err(ReproError::OutOfBounds { row, col, shape });
        }

        let values = self
            .composites()
            .iter()
            .map(|grid| grid.get(row, col))
            .collect();
        Ok(PointSample::new(row, col, values))
    }

    /// Per-cell sample standard deviation over the repetitions
    ///
    /// Cost is O(rows * cols * repetitions). Requires at least two
    /// repetitions; with fewer the dispersion is undefined everywhere and
    /// `InsufficientSample` is returned.
    pub fn sigma_grid(&self) -> Result<Grid> {
        if self.len() < 2 {
            return Err(ReproError::InsufficientSample {
                required: 2,
                found: self.len(),
            });
        }
        Ok(reduce_cells(
            self.composites(),
            self.shape(),
            stats::sample_std_dev,
        ))
    }
}

/// Mean of all defined cells of a sigma grid (Sigma_k)
///
/// `None` when no cell had two or more defined repetitions.
pub fn subject_sigma(sigma_grid: &Grid) -> Option<f64> {
    let defined: Vec<f64> = sigma_grid.defined_values().collect();
    stats::mean(&defined)
}
