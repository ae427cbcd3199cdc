//! CLI argument parsing for repro-sigma

use crate::config::ReproConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Grid cell coordinates given as `ROW,COL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointArg {
    pub row: usize,
    pub col: usize,
}

fn parse_point(s: &str) -> Result<PointArg, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row '{}': {}", row, e))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column '{}': {}", col, e))?;
    Ok(PointArg { row, col })
}

#[derive(Parser, Debug)]
#[command(name = "repro-sigma")]
#[command(version)]
#[command(
    about = "Reproducibility validation for repeated depth-scan grids",
    long_about = None
)]
pub struct Cli {
    /// Dataset root holding the batch_* subject folders
    #[arg(value_name = "ROOT", default_value = "./batch")]
    pub root: PathBuf,

    /// TOML run configuration (sentinel, threshold, alpha, ...)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Explicit TOML dataset manifest instead of folder discovery
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Process a single subject (label like batch_003, or id like 003)
    #[arg(short = 'b', long = "batch", value_name = "SUBJECT")]
    pub batch: Option<String>,

    /// Inspect one grid cell of the selected subject instead of a full run
    #[arg(
        long = "point",
        value_name = "ROW,COL",
        value_parser = parse_point,
        requires = "batch"
    )]
    pub point: Option<PointArg>,

    /// Reproducibility threshold in reporting units (default: 20 µm)
    #[arg(long = "threshold", value_name = "VALUE")]
    pub threshold: Option<f64>,

    /// Significance level of the one-sided t-test (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Stored value meaning "no measurement" (default: -999.99)
    #[arg(long = "sentinel", value_name = "VALUE", allow_hyphen_values = true)]
    pub sentinel: Option<f64>,

    /// Do not write composites, mean grids or the population table
    #[arg(long = "no-write")]
    pub no_write: bool,

    /// Process subjects one at a time
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut ReproConfig) {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(sentinel) = self.sentinel {
            config.sentinel = sentinel;
        }
        if self.no_write {
            config.write_outputs = false;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}
