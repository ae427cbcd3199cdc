// Validation verdict for the population reproducibility test

use crate::config::ReproConfig;
use crate::error::{ReproError, Result};
use crate::stats::Summary;
use crate::validation::statistics::t_quantile;
use serde::Serialize;

/// Outcome of one decision rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// H0 rejected: reproducibility below the threshold
    Adequate,
    /// H0 not rejected
    Inadequate,
}

impl Decision {
    fn from_bool(adequate: bool) -> Self {
        if adequate {
            Decision::Adequate
        } else {
            Decision::Inadequate
        }
    }

    pub fn is_adequate(self) -> bool {
        self == Decision::Adequate
    }
}

/// Derived statistics and both decisions of the one-sided t-test
///
/// All values are in reporting units. Computed once per run, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationVerdict {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub degrees_of_freedom: usize,
    pub standard_error: f64,
    pub t_statistic: f64,
    /// alpha-quantile of t(n - 1), left tail
    pub t_critical: f64,
    /// (1 - alpha)-quantile of t(n - 1)
    pub t_confidence: f64,
    /// One-sided upper confidence bound on the mean
    pub confidence_bound: f64,
    pub threshold: f64,
    pub alpha: f64,
    /// Rule A: t_statistic < t_critical
    pub t_test: Decision,
    /// Rule B: confidence_bound < threshold
    pub confidence_rule: Decision,
}

impl ValidationVerdict {
    /// Whether both rules reached the same decision
    pub fn rules_agree(&self) -> bool {
        self.t_test == self.confidence_rule
    }

    /// Generate human-readable report
    pub fn to_report_string(&self, unit: &str) -> String {
        let mut report = String::new();
        let rule = "=".repeat(50);
        let sep = "-".repeat(50);

        report.push_str(&format!("{}\n", rule));
        report.push_str(" VALIDATION TEST (one-sided Student t-test)\n");
        report.push_str(&format!("{}\n", rule));
        report.push_str(&format!(" H0: Sigma >= {} {}\n", self.threshold, unit));
        report.push_str(&format!(" H1: Sigma <  {} {} (target)\n", self.threshold, unit));
        report.push_str(&format!("{}\n", sep));
        report.push_str(&format!(" Subjects (N)            : {}\n", self.n));
        report.push_str(&format!(
            " Global mean (Sigma)     : {:.4} {}\n",
            self.mean, unit
        ));
        report.push_str(&format!(
            " Sample std dev (S)      : {:.4} {}\n",
            self.std_dev, unit
        ));
        report.push_str(&format!("{}\n", sep));
        report.push_str(&format!(" t statistic             : {:.4}\n", self.t_statistic));
        report.push_str(&format!(
            " Critical value (a={})  : {:.4}\n",
            self.alpha, self.t_critical
        ));
        report.push_str(&format!(
            " {:.0}% upper bound        : {:.4} {}\n",
            (1.0 - self.alpha) * 100.0,
            self.confidence_bound,
            unit
        ));
        report.push_str(&format!("{}\n", sep));

        let (mark, text) = decision_text(
            self.t_test,
            "H0 rejected -> ADEQUATE",
            "H0 not rejected -> INADEQUATE",
        );
        report.push_str(&format!(" {} t-test rule     : {}\n", mark, text));
        report.push_str(&format!(
            "    ({:.4} {} {:.4})\n",
            self.t_statistic,
            if self.t_test.is_adequate() { "<" } else { ">=" },
            self.t_critical
        ));

        let (mark, text) = decision_text(self.confidence_rule, "ADEQUATE", "INADEQUATE");
        report.push_str(&format!(" {} Confidence rule : {}\n", mark, text));
        report.push_str(&format!(
            "    ({:.4} {} {} {})\n",
            self.confidence_bound,
            unit,
            if self.confidence_rule.is_adequate() { "<" } else { ">=" },
            self.threshold
        ));

        if !self.rules_agree() {
            report.push_str(" ⚠️  Decision rules disagree\n");
        }
        report.push_str(&format!("{}\n", rule));

        report
    }
}

fn decision_text(
    decision: Decision,
    adequate: &'static str,
    inadequate: &'static str,
) -> (&'static str, &'static str) {
    match decision {
        Decision::Adequate => ("✅", adequate),
        Decision::Inadequate => ("❌", inadequate),
    }
}

/// One-sided one-sample t-test against a fixed tolerance threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HypothesisValidator {
    threshold: f64,
    alpha: f64,
}

impl HypothesisValidator {
    pub fn new(threshold: f64, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ReproError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                alpha
            )));
        }
        Ok(Self { threshold, alpha })
    }

    pub fn from_config(config: &ReproConfig) -> Result<Self> {
        Self::new(config.threshold, config.alpha)
    }

    /// Test the population mean against the threshold
    ///
    /// `summary` must be in the same units as the threshold. Fails with
    /// `InsufficientSample` when fewer than two subjects are available.
    ///
    /// A zero spread gives an infinite t statistic (or NaN when the mean sits
    /// exactly on the threshold, which rule A then treats as not rejected).
    pub fn validate(&self, summary: &Summary) -> Result<ValidationVerdict> {
        let std_dev = match summary.std_dev {
            Some(std_dev) if summary.n >= 2 => std_dev,
            _ => {
                return Err(ReproError::InsufficientSample {
                    required: 2,
                    found: summary.n,
                })
            }
        };

        let degrees_of_freedom = summary.n - 1;
        let df = degrees_of_freedom as f64;
        let standard_error = std_dev / (summary.n as f64).sqrt();
        let t_statistic = (summary.mean - self.threshold) / standard_error;

        let t_critical = t_quantile(self.alpha, df)?;
        let t_confidence = t_quantile(1.0 - self.alpha, df)?;
        let confidence_bound = summary.mean + t_confidence * standard_error;

        let verdict = ValidationVerdict {
            n: summary.n,
            mean: summary.mean,
            std_dev,
            degrees_of_freedom,
            standard_error,
            t_statistic,
            t_critical,
            t_confidence,
            confidence_bound,
            threshold: self.threshold,
            alpha: self.alpha,
            t_test: Decision::from_bool(t_statistic < t_critical),
            confidence_rule: Decision::from_bool(confidence_bound < self.threshold),
        };

        tracing::info!(
            "t = {:.4} (critical {:.4}), upper bound {:.4} vs threshold {}",
            verdict.t_statistic,
            verdict.t_critical,
            verdict.confidence_bound,
            verdict.threshold
        );

        Ok(verdict)
    }
}
