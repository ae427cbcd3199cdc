// Cell-wise reductions over stacks of same-shape grids
//
// Each reduction reads immutable input grids and allocates a new output
// grid. A cell's reducer sees only the defined values at that cell across
// the stack; when it has nothing to work with the output cell is missing.
//
// - AngleScanSet::composite: minimum across angle scans (worst-case depth)
// - SubjectRepetitions::mean_grid: mean across repetitions
// - SubjectRepetitions::sigma_grid: sample standard deviation per cell
// - subject_sigma: mean of the defined sigma cells (Sigma_k)

mod composite;
mod mean;
mod sigma;

pub use composite::AngleScanSet;
pub use mean::SubjectRepetitions;
pub use sigma::{subject_sigma, PointSample};

use crate::grid::{Cell, Grid, Shape};

/// Reduce a stack of same-shape grids cell by cell
///
/// `reducer` receives the defined values at one cell (possibly empty) and
/// returns the output cell. Shapes must already be validated.
pub(crate) fn reduce_cells<F>(grids: &[Grid], shape: Shape, reducer: F) -> Grid
where
    F: Fn(&[f64]) -> Cell,
{
    let mut values = Vec::with_capacity(grids.len());
    Grid::from_fn(shape, |row, col| {
        values.clear();
        values.extend(grids.iter().filter_map(|grid| grid.get(row, col)));
        if values.is_empty() {
            None
        } else {
            reducer(&values)
        }
    })
}
