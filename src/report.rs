//! Human-readable rendering of run results

use crate::pipeline::{PointInspection, RunReport};

/// Reporting unit label matching the default unit scale (mm -> µm)
pub const REPORT_UNIT: &str = "µm";

fn section(title: &str) -> String {
    let sep = "-".repeat(40);
    format!("{}\n {}\n{}\n", sep, title, sep)
}

/// Render a full run: per-subject scores, population summary and verdict
pub fn render_run(report: &RunReport, unit_scale: f64, unit: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== POPULATION ANALYSIS (N={}) ===\n",
        report.subjects.len()
    ));
    for outcome in &report.subjects {
        match outcome.sigma {
            Some(sigma) => out.push_str(&format!(
                "  [Batch {}] Sigma_k = {:.6} mm ({:.3} {}, {} repetitions)\n",
                outcome.id.id(),
                sigma,
                sigma * unit_scale,
                unit,
                outcome.repetitions_used
            )),
            None => out.push_str(&format!(
                "  [Batch {}] Invalid or insufficient data\n",
                outcome.id.id()
            )),
        }
        for failure in &outcome.failures {
            out.push_str(&format!(
                "      ! {} ({}): {}\n",
                failure.unit, failure.kind, failure.message
            ));
        }
    }
    out.push('\n');

    if let (Some(stats), Some(scaled)) = (&report.population, &report.population_scaled) {
        let summary = &stats.summary;
        out.push_str(&section("GLOBAL RESULTS"));
        out.push_str(&format!(" Subjects (N)              : {}\n", summary.n));
        out.push_str(&format!(" Sigma_global (mean)       : {:.6} mm\n", summary.mean));
        out.push_str(&format!(" Converted                 : {:.3} {}\n", scaled.mean, unit));
        match summary.std_dev {
            Some(std_dev) => {
                out.push_str(&format!(" Inter-subject spread      : ±{:.6} mm\n", std_dev))
            }
            None => out.push_str(" Inter-subject spread      : undefined (N < 2)\n"),
        }
        out.push_str(&format!(
            " Best case ({:<9})     : {:.6} mm\n",
            stats.best.label(),
            summary.min
        ));
        out.push_str(&format!(
            " Worst case ({:<9})    : {:.6} mm\n",
            stats.worst.label(),
            summary.max
        ));
        out.push_str(&"-".repeat(40));
        out.push('\n');
    }

    if let Some(verdict) = &report.verdict {
        out.push('\n');
        out.push_str(&verdict.to_report_string(unit));
    }

    for failure in &report.failures {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            failure.kind, failure.unit, failure.message
        ));
    }

    out
}

/// Render a single-cell inspection
pub fn render_point(inspection: &PointInspection, unit_scale: f64, unit: &str) -> String {
    let sample = &inspection.sample;
    let mut out = String::new();

    out.push_str(&format!(
        "--- POINT ({}, {}) for {} ---\n",
        sample.row, sample.col, inspection.subject
    ));
    for (i, (name, value)) in inspection
        .repetitions
        .iter()
        .zip(&sample.values)
        .enumerate()
    {
        match value {
            Some(z) => out.push_str(&format!(
                "  Repetition {} ({}) : Z = {:.4}\n",
                i + 1,
                name,
                z
            )),
            None => out.push_str(&format!("  Repetition {} ({}) : missing\n", i + 1, name)),
        }
    }

    out.push_str(&"-".repeat(40));
    out.push('\n');
    out.push_str(&format!(
        "Valid measurements (M)     : {} / {}\n",
        sample.defined,
        sample.values.len()
    ));
    match (sample.mean, sample.sigma) {
        (Some(mean), Some(sigma)) => {
            out.push_str(&format!("Local mean (z_jk)          : {:.5} mm\n", mean));
            out.push_str(&format!("Std dev (sigma_jk)         : {:.5} mm\n", sigma));
            out.push_str(&format!(
                "Estimated variation        : {:.2} {}\n",
                sigma * unit_scale,
                unit
            ));
        }
        _ => out.push_str("Not computable (fewer than 2 valid values)\n"),
    }
    out.push_str(&"-".repeat(40));
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SubjectId;
    use crate::pipeline::{SubjectOutcome, UnitFailure};
    use crate::population::{aggregate, PopulationSample};
    use crate::reduce::PointSample;

    fn outcome(label: &str, sigma: Option<f64>) -> SubjectOutcome {
        SubjectOutcome {
            id: SubjectId::parse(label),
            repetitions: vec![],
            repetitions_used: 2,
            shape: None,
            sigma,
            sigma_cells: 4,
            failures: vec![],
        }
    }

    #[test]
    fn test_render_single_subject_without_verdict() {
        let subjects = vec![outcome("batch_001", Some(0.0123)), outcome("batch_002", None)];
        let sample: PopulationSample = vec![(SubjectId::parse("batch_001"), 0.0123)]
            .into_iter()
            .collect();
        let population = aggregate(&sample).unwrap();
        let scaled = population.summary.scaled(1000.0);
        let report = RunReport {
            subjects,
            sample,
            population: Some(population),
            population_scaled: Some(scaled),
            verdict: None,
            failures: vec![UnitFailure {
                unit: "population".to_string(),
                kind: "InsufficientSample",
                message: "need at least 2".to_string(),
            }],
        };

        let text = render_run(&report, 1000.0, REPORT_UNIT);
        assert!(text.contains("[Batch 001] Sigma_k = 0.012300 mm (12.300 µm"));
        assert!(text.contains("[Batch 002] Invalid or insufficient data"));
        assert!(text.contains("undefined (N < 2)"));
        assert!(text.contains("[InsufficientSample] population"));
        assert!(!text.contains("VALIDATION TEST"));
    }

    #[test]
    fn test_render_point_with_missing_value() {
        let inspection = PointInspection {
            subject: SubjectId::parse("batch_001"),
            repetitions: vec!["dsi_01".into(), "dsi_02".into(), "dsi_03".into()],
            sample: PointSample::new(1, 2, vec![Some(10.0), None, Some(12.0)]),
        };

        let text = render_point(&inspection, 1000.0, REPORT_UNIT);
        assert!(text.contains("POINT (1, 2) for batch_001"));
        assert!(text.contains("Repetition 2 (dsi_02) : missing"));
        assert!(text.contains("Valid measurements (M)     : 2 / 3"));
        assert!(text.contains("Local mean (z_jk)          : 11.00000 mm"));
    }

    #[test]
    fn test_render_point_not_computable() {
        let inspection = PointInspection {
            subject: SubjectId::parse("batch_001"),
            repetitions: vec!["dsi_01".into(), "dsi_02".into()],
            sample: PointSample::new(0, 0, vec![None, Some(1.0)]),
        };
        assert!(render_point(&inspection, 1000.0, REPORT_UNIT).contains("Not computable"));
    }
}
