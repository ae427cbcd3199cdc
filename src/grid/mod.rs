// Depth grids with explicit missing cells
//
// A scan is stored on disk as a rectangle of numbers where a reserved sentinel
// marks "no measurement". In memory every cell is an `Option<f64>`: the
// sentinel is decoded to `None` on read and re-encoded on write, so no
// reduction ever does arithmetic on the sentinel itself.

mod cleaner;
mod codec;

pub use cleaner::GridCleaner;
pub use codec::{decode_grid, encode_grid};

use crate::error::{ReproError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One grid cell: `Some(depth)` or `None` for a missing measurement
pub type Cell = Option<f64>;

/// Grid dimensions (rows x columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Immutable row-major grid of depth cells
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: Shape,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from rows, rejecting ragged input
    ///
    /// # Example
    /// ```
    /// use repro_sigma::grid::Grid;
    ///
    /// let rows = vec![vec![Some(1.0), None], vec![Some(3.0), Some(4.0)]];
    /// let grid = Grid::from_rows(rows).unwrap();
    /// assert_eq!(grid.shape().to_string(), "2x2");
    /// assert_eq!(grid.defined_count(), 3);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * cols);

        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ReproError::RaggedRow {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            shape: Shape::new(rows.len(), cols),
            cells,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(shape.len());
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                cells.push(f(row, col));
            }
        }
        Self { shape, cells }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Cell at (row, col), or `None` when missing or out of range
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if self.shape.contains(row, col) {
            self.cells[row * self.shape.cols + col]
        } else {
            None
        }
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() panics on zero; an empty grid yields no rows
        self.cells.chunks(self.shape.cols.max(1))
    }

    /// Measured (non-missing) values in row-major order
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    pub fn defined_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.defined_count() == 0
    }

    /// Apply `f` to every measured value, keeping missing cells missing
    pub fn map_defined(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            shape: self.shape,
            cells: self.cells.iter().map(|cell| cell.map(&f)).collect(),
        }
    }
}

/// Check that every grid shares the first grid's shape
///
/// Returns the common shape, `EmptyInput` for an empty slice, or
/// `DimensionMismatch` naming the first offending shape.
pub fn common_shape(grids: &[Grid], unit: &str) -> Result<Shape> {
    let first = grids.first().ok_or_else(|| ReproError::empty(unit))?;
    let expected = first.shape();

    for grid in &grids[1..] {
        if grid.shape() != expected {
            return Err(ReproError::DimensionMismatch {
                expected,
                found: grid.shape(),
            });
        }
    }

    Ok(expected)
}
