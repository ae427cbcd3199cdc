//! Population aggregation of subject reproducibility scores
//!
//! Collects one Sigma_k per subject with a defined score. Subjects whose
//! score is undefined are excluded, never counted as zero.

use crate::error::{ReproError, Result};
use crate::manifest::SubjectId;
use crate::stats::Summary;

/// One subject's reproducibility score (Sigma_k, grid units)
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectScore {
    pub subject: SubjectId,
    pub sigma: f64,
}

/// Ordered (subject, Sigma_k) pairs across the population
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationSample {
    scores: Vec<SubjectScore>,
}

impl PopulationSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: SubjectId, sigma: f64) {
        self.scores.push(SubjectScore { subject, sigma });
    }

    pub fn scores(&self) -> &[SubjectScore] {
        &self.scores
    }

    pub fn values(&self) -> Vec<f64> {
        self.scores.iter().map(|score| score.sigma).collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(SubjectId, f64)> for PopulationSample {
    fn from_iter<I: IntoIterator<Item = (SubjectId, f64)>>(iter: I) -> Self {
        let mut sample = Self::new();
        for (subject, sigma) in iter {
            sample.push(subject, sigma);
        }
        sample
    }
}

/// Population statistics (Sigma_global) with the extreme subjects
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStats {
    /// n, mean, sample std (None when n < 2), min, max
    pub summary: Summary,
    /// Subject with the smallest Sigma_k
    pub best: SubjectId,
    /// Subject with the largest Sigma_k
    pub worst: SubjectId,
}

/// Aggregate a population sample
///
/// Fails with `EmptyInput` when no subject has a defined score. With a
/// single subject the spread is undefined but mean/min/max are reported.
///
/// # Example
/// ```
/// use repro_sigma::manifest::SubjectId;
/// use repro_sigma::population::{aggregate, PopulationSample};
///
/// let sample: PopulationSample = [("batch_001", 0.010), ("batch_002", 0.014)]
///     .into_iter()
///     .map(|(label, sigma)| (SubjectId::parse(label), sigma))
///     .collect();
/// let stats = aggregate(&sample).unwrap();
/// assert!((stats.summary.mean - 0.012).abs() < 1e-12);
/// assert_eq!(stats.worst.id(), "002");
/// ```
pub fn aggregate(sample: &PopulationSample) -> Result<PopulationStats> {
    let values = sample.values();
    let summary = Summary::of(&values).ok_or_else(|| ReproError::empty("population"))?;

    // First occurrence wins on ties, keeping the result order-stable
    let mut best = &sample.scores[0];
    let mut worst = &sample.scores[0];
    for score in &sample.scores[1..] {
        if score.sigma < best.sigma {
            best = score;
        }
        if score.sigma > worst.sigma {
            worst = score;
        }
    }

    if summary.std_dev.is_none() {
        tracing::warn!("Population has a single subject; spread is undefined");
    }

    Ok(PopulationStats {
        summary,
        best: best.subject.clone(),
        worst: worst.subject.clone(),
    })
}
