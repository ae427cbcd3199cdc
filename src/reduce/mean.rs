use crate::error::Result;
use crate::grid::{common_shape, Grid, Shape};
use crate::reduce::reduce_cells;
use crate::stats;

/// The repetition composites of one subject (nominally 7)
///
/// Feeds the mean-grid reducer and the sigma calculators. Every composite
/// must share one shape; a mismatch is fatal to the subject.
#[derive(Debug, Clone)]
pub struct SubjectRepetitions {
    composites: Vec<Grid>,
    shape: Shape,
}

impl SubjectRepetitions {
    pub fn new(composites: Vec<Grid>) -> Result<Self> {
        let shape = common_shape(&composites, "subject repetitions")?;
        Ok(Self { composites, shape })
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn composites(&self) -> &[Grid] {
        &self.composites
    }

    /// Cell-wise mean over the defined repetitions
    ///
    /// The subject's best estimate of the true surface depth.
    pub fn mean_grid(&self) -> Grid {
        reduce_cells(&self.composites, self.shape, stats::mean)
    }
}
