// Student's t quantiles via statrs

use crate::error::{ReproError, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Quantile (inverse CDF) of the standard t distribution
///
/// `p` must lie in (0, 1) and `degrees_of_freedom` must be positive.
///
/// # Example
/// ```
/// use repro_sigma::validation::t_quantile;
///
/// let upper = t_quantile(0.95, 4.0).unwrap();
/// assert!((upper - 2.1318).abs() < 1e-3);
/// assert!((t_quantile(0.05, 4.0).unwrap() + upper).abs() < 1e-6);
/// ```
pub fn t_quantile(p: f64, degrees_of_freedom: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(ReproError::Distribution(format!(
            "quantile probability must be in (0, 1), got {}",
            p
        )));
    }

    let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_err(|e| ReproError::Distribution(e.to_string()))?;
    Ok(distribution.inverse_cdf(p))
}
