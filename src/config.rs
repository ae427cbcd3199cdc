//! Run configuration
//!
//! One value carries every externally observable knob of a run: the missing
//! sentinel, the validation threshold and significance level, the nominal
//! acquisition counts and the output encoding. It is threaded through every
//! component so no two call sites can disagree on a constant.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a reproducibility validation run
///
/// # Example
/// ```
/// use repro_sigma::config::ReproConfig;
///
/// let config = ReproConfig::default();
/// assert_eq!(config.threshold, 20.0); // µm
/// assert_eq!(config.alpha, 0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReproConfig {
    /// Stored value meaning "no measurement"
    ///
    /// Default: -999.99. Files written with -999.9999 still decode as missing
    /// because the comparison is `value <= sentinel + tolerance`.
    pub sentinel: f64,

    /// Band above the sentinel that still counts as missing
    ///
    /// Default: 1e-5
    pub sentinel_tolerance: f64,

    /// Reproducibility tolerance in reporting units (after `unit_scale`)
    ///
    /// H0: population mean sigma >= threshold (inadequate).
    /// Default: 20.0 (µm)
    pub threshold: f64,

    /// Significance level of the one-sided t-test
    ///
    /// - 0.05 (default): 95% one-sided confidence bound
    /// - 0.01: stricter, harder to declare reproducibility adequate
    pub alpha: f64,

    /// Factor from grid units to reporting units
    ///
    /// Default: 1000.0 (grids in mm, validation in µm)
    pub unit_scale: f64,

    /// Nominal angle scans per repetition
    pub nominal_angles: usize,

    /// Nominal repetitions per subject (folders dsi_01..dsi_NN)
    pub nominal_repetitions: usize,

    /// Decimals written per value in output grids
    pub write_precision: usize,

    /// Persist composites, mean grids and the population table
    pub write_outputs: bool,

    /// Process subjects concurrently (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for ReproConfig {
    fn default() -> Self {
        Self {
            sentinel: -999.99,
            sentinel_tolerance: 1e-5,
            threshold: 20.0,
            alpha: 0.05,
            unit_scale: 1000.0,
            nominal_angles: 5,
            nominal_repetitions: 7,
            write_precision: 4,
            write_outputs: true,
            parallel: true,
        }
    }
}

impl ReproConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    ///
    /// # Example TOML
    /// ```toml
    /// sentinel = -999.9999
    /// threshold = 15.0
    /// alpha = 0.01
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.sentinel.is_finite() {
            return Err(format!("sentinel must be finite, got {}", self.sentinel));
        }

        if !(self.sentinel_tolerance > 0.0 && self.sentinel_tolerance.is_finite()) {
            return Err(format!(
                "sentinel_tolerance must be positive, got {}",
                self.sentinel_tolerance
            ));
        }

        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }

        if !self.threshold.is_finite() {
            return Err(format!("threshold must be finite, got {}", self.threshold));
        }

        if !(self.unit_scale > 0.0 && self.unit_scale.is_finite()) {
            return Err(format!(
                "unit_scale must be positive, got {}",
                self.unit_scale
            ));
        }

        if self.nominal_angles == 0 {
            return Err("nominal_angles must be >= 1".to_string());
        }

        if self.nominal_repetitions == 0 || self.nominal_repetitions > 99 {
            return Err(format!(
                "nominal_repetitions must be in 1..=99, got {}",
                self.nominal_repetitions
            ));
        }

        Ok(())
    }
}
