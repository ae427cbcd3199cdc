//! Grid storage capability
//!
//! The pipeline only ever loads grids through a [`GridStore`] and writes its
//! results back through it. Read problems of any kind (missing file, bad
//! number, ragged rows, empty file) surface as `ReadFailure` naming the
//! handle, so the caller can drop that one scan and continue.

use crate::config::ReproConfig;
use crate::error::{ReproError, Result};
use crate::grid::{decode_grid, encode_grid, Grid, GridCleaner};
use crate::manifest::ScanHandle;
use std::fs;
use std::path::Path;

/// Load and persist grids for a pipeline run
pub trait GridStore: Send + Sync {
    /// Load one angle scan; never returns a partially populated grid
    fn load_grid(&self, handle: &ScanHandle) -> Result<Grid>;

    /// Persist a result grid
    fn save_grid(&self, path: &Path, grid: &Grid) -> Result<()>;

    /// Persist a tabular result
    fn save_table(&self, path: &Path, contents: &str) -> Result<()>;
}

/// Grid store backed by text files on the local filesystem
#[derive(Debug, Clone)]
pub struct FsGridStore {
    cleaner: GridCleaner,
    precision: usize,
}

impl FsGridStore {
    pub fn new(cleaner: GridCleaner, precision: usize) -> Self {
        Self { cleaner, precision }
    }

    pub fn from_config(config: &ReproConfig) -> Self {
        Self::new(GridCleaner::from_config(config), config.write_precision)
    }

    fn read_failure(handle: &ScanHandle, reason: impl ToString) -> ReproError {
        ReproError::ReadFailure {
            handle: handle.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl GridStore for FsGridStore {
    fn load_grid(&self, handle: &ScanHandle) -> Result<Grid> {
        let text =
            fs::read_to_string(handle.path()).map_err(|e| Self::read_failure(handle, e))?;
        let grid =
            decode_grid(&text, &self.cleaner).map_err(|e| Self::read_failure(handle, e))?;

        if grid.shape().is_empty() {
            return Err(Self::read_failure(handle, "file contains no values"));
        }

        tracing::debug!("Loaded {} ({})", handle, grid.shape());
        Ok(grid)
    }

    fn save_grid(&self, path: &Path, grid: &Grid) -> Result<()> {
        self.save_table(path, &encode_grid(grid, &self.cleaner, self.precision))
    }

    fn save_table(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|source| ReproError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
