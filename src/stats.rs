//! Descriptive statistics over measured values
//!
//! Thin wrappers over `statrs`. Callers filter missing cells out before
//! calling in; statrs answers NaN for a sample that is too small, which is
//! reported here as `None` instead.

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::mean(values))
}

/// Sample variance with Bessel's correction (divisor n - 1)
///
/// `None` when fewer than two values are available.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(Statistics::variance(values))
}

/// Sample standard deviation (square root of [`sample_variance`])
///
/// # Example
/// ```
/// use repro_sigma::stats::sample_std_dev;
///
/// let sigma = sample_std_dev(&[10.0, 12.0, 11.0, 13.0]).unwrap();
/// assert!((sigma - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
/// assert_eq!(sample_std_dev(&[10.0]), None);
/// ```
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(Statistics::std_dev(values))
}

pub fn min(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::min(values))
}

pub fn max(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Statistics::max(values))
}

/// Mean, spread and range of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` when n < 2
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize a sample, `None` when it is empty
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            n: values.len(),
            mean: mean(values)?,
            std_dev: sample_std_dev(values),
            min: min(values)?,
            max: max(values)?,
        })
    }

    /// Rescale every location/spread statistic by a positive factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            n: self.n,
            mean: self.mean * factor,
            std_dev: self.std_dev.map(|s| s * factor),
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}
