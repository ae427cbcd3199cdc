// One-sided Student's t-test of population reproducibility
//
// H0: mean Sigma >= threshold (reproducibility inadequate)
// H1: mean Sigma <  threshold (reproducibility adequate)
//
// Two decision rules are derived from the same sample and reported side by
// side, never collapsed into one:
// - Rule A (t-test): reject H0 iff t < t_alpha(n - 1)
// - Rule B (confidence bound): adequate iff mean + t_{1-alpha}(n - 1) * SE < threshold
//
// Quantiles of the t distribution come from statrs and are trusted as-is.

mod statistics;
mod verdict;

pub use statistics::t_quantile;
pub use verdict::{Decision, HypothesisValidator, ValidationVerdict};
