use crate::error::Result;
use crate::grid::{common_shape, Grid, Shape};
use crate::reduce::reduce_cells;
use crate::stats;

/// The angle scans of one repetition (nominally 5)
///
/// Construction checks that the set is non-empty and that every scan has the
/// same shape; a mismatch is fatal to this repetition only.
#[derive(Debug, Clone)]
pub struct AngleScanSet {
    scans: Vec<Grid>,
    shape: Shape,
}

impl AngleScanSet {
    pub fn new(scans: Vec<Grid>) -> Result<Self> {
        let shape = common_shape(&scans, "angle scan set")?;
        Ok(Self { scans, shape })
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Cell-wise minimum over the defined scans
    ///
    /// The smallest depth across viewing angles is the deepest excursion
    /// seen from any angle. A cell is missing only if every scan misses it.
    ///
    /// # Example
    /// ```
    /// use repro_sigma::grid::Grid;
    /// use repro_sigma::reduce::AngleScanSet;
    ///
    /// let a = Grid::from_rows(vec![vec![Some(5.0), None], vec![Some(3.0), Some(7.0)]]).unwrap();
    /// let b = Grid::from_rows(vec![vec![Some(4.0), Some(2.0)], vec![Some(6.0), None]]).unwrap();
    /// let composite = AngleScanSet::new(vec![a, b]).unwrap().composite();
    /// assert_eq!(composite.cells(), &[Some(4.0), Some(2.0), Some(3.0), Some(7.0)]);
    /// ```
    pub fn composite(&self) -> Grid {
        reduce_cells(&self.scans, self.shape, stats::min)
    }
}
