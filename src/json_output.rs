//! JSON output format for a reproducibility run

use crate::pipeline::{RepetitionSummary, RunReport, SubjectOutcome, UnitFailure};
use crate::validation::ValidationVerdict;
use serde::Serialize;

/// One subject's result
#[derive(Debug, Clone, Serialize)]
pub struct JsonSubject {
    /// Folder label (e.g., "batch_001")
    pub label: String,
    /// Numeric id parsed from the label, or "unknown"
    pub id: String,
    pub repetitions_used: usize,
    pub repetitions: Vec<RepetitionSummary>,
    /// Sigma_k in grid units (mm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma_mm: Option<f64>,
    /// Sigma_k in reporting units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    pub sigma_cells: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UnitFailure>,
}

impl JsonSubject {
    fn from_outcome(outcome: &SubjectOutcome, unit_scale: f64) -> Self {
        Self {
            label: outcome.id.label().to_string(),
            id: outcome.id.id().to_string(),
            repetitions_used: outcome.repetitions_used,
            repetitions: outcome.repetitions.clone(),
            sigma_mm: outcome.sigma,
            sigma: outcome.sigma.map(|sigma| sigma * unit_scale),
            sigma_cells: outcome.sigma_cells,
            failures: outcome.failures.clone(),
        }
    }
}

/// Population statistics in reporting units
#[derive(Debug, Clone, Serialize)]
pub struct JsonPopulation {
    pub n: usize,
    /// Sigma_global in grid units (mm)
    pub mean_mm: f64,
    pub mean: f64,
    /// Absent with a single subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub best: String,
    pub worst: String,
    pub unit: String,
}

/// Complete JSON document for a run
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunReport {
    pub version: String,
    pub subjects: Vec<JsonSubject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<JsonPopulation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ValidationVerdict>,
    /// Population-level failures
    pub failures: Vec<UnitFailure>,
}

impl JsonRunReport {
    pub fn from_run(report: &RunReport, unit_scale: f64, unit: &str) -> Self {
        let population = match (&report.population, &report.population_scaled) {
            (Some(stats), Some(scaled)) => Some(JsonPopulation {
                n: scaled.n,
                mean_mm: stats.summary.mean,
                mean: scaled.mean,
                std_dev: scaled.std_dev,
                min: scaled.min,
                max: scaled.max,
                best: stats.best.label().to_string(),
                worst: stats.worst.label().to_string(),
                unit: unit.to_string(),
            }),
            _ => None,
        };

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            subjects: report
                .subjects
                .iter()
                .map(|outcome| JsonSubject::from_outcome(outcome, unit_scale))
                .collect(),
            population,
            verdict: report.verdict.clone(),
            failures: report.failures.clone(),
        }
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
