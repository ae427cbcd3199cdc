//! Error taxonomy for the reduction and validation pipeline
//!
//! Every failure is scoped to the smallest unit that can continue without it
//! (one scan, one repetition, one subject). Callers match on the variant to
//! decide whether to skip or abort.

use crate::grid::Shape;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by grid decoding, reductions and validation
#[derive(Error, Debug)]
pub enum ReproError {
    #[error("Failed to read grid {handle}: {reason}")]
    ReadFailure { handle: String, reason: String },

    #[error("Malformed value on line {line}, column {column}: {reason}")]
    Malformed {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("No valid input for {unit}")]
    EmptyInput { unit: String },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: Shape, found: Shape },

    #[error("Insufficient sample: need at least {required} values, found {found}")]
    InsufficientSample { required: usize, found: usize },

    #[error("Cell ({row}, {col}) is outside grid {shape}")]
    OutOfBounds { row: usize, col: usize, shape: Shape },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl ReproError {
    /// Short stable name of the error kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ReproError::ReadFailure { .. }
            | ReproError::Malformed { .. }
            | ReproError::RaggedRow { .. } => "ReadFailure",
            ReproError::EmptyInput { .. } => "EmptyInput",
            ReproError::DimensionMismatch { .. } => "DimensionMismatch",
            ReproError::InsufficientSample { .. } => "InsufficientSample",
            ReproError::OutOfBounds { .. } => "OutOfBounds",
            ReproError::WriteFailure { .. } => "WriteFailure",
            ReproError::InvalidConfig(_) => "InvalidConfig",
            ReproError::Distribution(_) => "Distribution",
        }
    }

    pub(crate) fn empty(unit: impl Into<String>) -> Self {
        ReproError::EmptyInput { unit: unit.into() }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ReproError>;
