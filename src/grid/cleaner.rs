use crate::config::ReproConfig;
use crate::error::Result;
use crate::grid::{Cell, Grid};

/// Maps raw stored numbers to cells, and cells back to stored numbers
///
/// A stored value at or below `sentinel + tolerance` is a missing
/// measurement. The tolerance absorbs decimal round-trip error, so both
/// -999.99 and the more negative -999.9999 variant decode as missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCleaner {
    sentinel: f64,
    tolerance: f64,
}

impl GridCleaner {
    pub fn new(sentinel: f64, tolerance: f64) -> Self {
        Self {
            sentinel,
            tolerance,
        }
    }

    pub fn from_config(config: &ReproConfig) -> Self {
        Self::new(config.sentinel, config.sentinel_tolerance)
    }

    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    /// Decode one stored number; non-finite values are missing as well
    pub fn decode(&self, raw: f64) -> Cell {
        if !raw.is_finite() || raw <= self.sentinel + self.tolerance {
            None
        } else {
            Some(raw)
        }
    }

    /// Encode one cell for storage
    pub fn encode(&self, cell: Cell) -> f64 {
        cell.unwrap_or(self.sentinel)
    }

    /// Clean a raw numeric grid into a grid with explicit missing cells
    pub fn clean(&self, raw: &[Vec<f64>]) -> Result<Grid> {
        let rows = raw
            .iter()
            .map(|row| row.iter().map(|&value| self.decode(value)).collect())
            .collect();
        Grid::from_rows(rows)
    }
}

impl Default for GridCleaner {
    fn default() -> Self {
        Self::from_config(&ReproConfig::default())
    }
}
