//! Reproducibility pipeline orchestration
//!
//! Drives the reductions over a [`DatasetManifest`]:
//!
//! ```text
//! angle scans -> composite (per repetition) -> mean grid / sigma grid
//!             -> Sigma_k (per subject) -> population stats -> verdict
//! ```
//!
//! Failures are contained at the smallest unit that can continue without
//! them: a bad scan drops that scan, a repetition with no readable scan or
//! mismatched shapes is skipped, a subject with mismatched composites or
//! fewer than two repetitions gets no score. Only the population test stops
//! as a whole, and only when fewer than two subjects have a score.

use crate::config::ReproConfig;
use crate::csv_output::CsvPopulationOutput;
use crate::error::{ReproError, Result};
use crate::grid::{Grid, Shape};
use crate::manifest::{DatasetManifest, RepetitionEntry, SubjectEntry, SubjectId};
use crate::population::{aggregate, PopulationSample, PopulationStats};
use crate::reduce::{subject_sigma, AngleScanSet, PointSample, SubjectRepetitions};
use crate::stats::Summary;
use crate::store::GridStore;
use crate::validation::{HypothesisValidator, ValidationVerdict};
use serde::Serialize;

/// A contained failure of one unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    /// Scan handle, `subject/repetition`, subject label or `population`
    pub unit: String,
    pub kind: &'static str,
    pub message: String,
}

impl UnitFailure {
    fn new(unit: impl Into<String>, error: &ReproError) -> Self {
        let unit = unit.into();
        tracing::warn!("[{}] {}: {}", error.kind(), unit, error);
        Self {
            unit,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Summary of one repetition's reduction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepetitionSummary {
    pub name: String,
    pub scans_listed: usize,
    pub scans_used: usize,
    pub composite_built: bool,
}

/// Result of processing one subject
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOutcome {
    pub id: SubjectId,
    pub repetitions: Vec<RepetitionSummary>,
    /// Composites that entered the mean and sigma reductions
    pub repetitions_used: usize,
    pub shape: Option<Shape>,
    /// Sigma_k in grid units; `None` when undefined
    pub sigma: Option<f64>,
    /// Number of cells with a defined point sigma
    pub sigma_cells: usize,
    pub failures: Vec<UnitFailure>,
}

/// In-memory products of one subject's reductions
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGrids {
    pub mean_grid: Grid,
    /// `None` with fewer than two repetitions
    pub sigma_grid: Option<Grid>,
    pub sigma: Option<f64>,
}

/// One cell's repetition values for a single subject
#[derive(Debug, Clone, PartialEq)]
pub struct PointInspection {
    pub subject: SubjectId,
    /// Repetition names aligned with `sample.values`
    pub repetitions: Vec<String>,
    pub sample: PointSample,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub subjects: Vec<SubjectOutcome>,
    /// Subjects with a defined Sigma_k, in manifest order (grid units)
    pub sample: PopulationSample,
    /// Population statistics in grid units
    pub population: Option<PopulationStats>,
    /// Population statistics in reporting units
    pub population_scaled: Option<Summary>,
    pub verdict: Option<ValidationVerdict>,
    /// Population-level failures (empty population, test impossible, export)
    pub failures: Vec<UnitFailure>,
}

impl RunReport {
    /// Number of contained failures across every unit
    pub fn failure_count(&self) -> usize {
        self.failures.len()
            + self
                .subjects
                .iter()
                .map(|subject| subject.failures.len())
                .sum::<usize>()
    }
}

/// Pipeline over a grid store and one run configuration
pub struct Pipeline<'a, S: GridStore> {
    store: &'a S,
    config: &'a ReproConfig,
}

impl<'a, S: GridStore> Pipeline<'a, S> {
    pub fn new(store: &'a S, config: &'a ReproConfig) -> Self {
        Self { store, config }
    }

    /// Load a repetition's angle scans and reduce them to one composite
    ///
    /// Unreadable scans are recorded in `failures` and skipped. Fails with
    /// `EmptyInput` when no scan could be read and `DimensionMismatch` when
    /// the readable scans disagree on shape.
    pub fn build_composite(
        &self,
        subject: &SubjectId,
        repetition: &RepetitionEntry,
        failures: &mut Vec<UnitFailure>,
    ) -> Result<(Grid, usize)> {
        let mut scans = Vec::with_capacity(repetition.scans.len());
        for handle in &repetition.scans {
            match self.store.load_grid(handle) {
                Ok(grid) => scans.push(grid),
                Err(e) => failures.push(UnitFailure::new(handle.to_string(), &e)),
            }
        }

        if scans.is_empty() {
            return Err(ReproError::empty(format!("{}/{}", subject, repetition.name)));
        }
        if scans.len() < self.config.nominal_angles {
            tracing::debug!(
                "{}/{}: {} of {} nominal angle scans",
                subject,
                repetition.name,
                scans.len(),
                self.config.nominal_angles
            );
        }

        let used = scans.len();
        let composite = AngleScanSet::new(scans)?.composite();
        Ok((composite, used))
    }

    /// Reduce a subject's composites to its mean grid, sigma grid and Sigma_k
    pub fn reduce_subject(&self, composites: Vec<Grid>) -> Result<SubjectGrids> {
        let repetitions = SubjectRepetitions::new(composites)?;
        let mean_grid = repetitions.mean_grid();

        let sigma_grid = match repetitions.sigma_grid() {
            Ok(grid) => Some(grid),
            Err(ReproError::InsufficientSample { .. }) => None,
            Err(e) => return Err(e),
        };
        let sigma = sigma_grid.as_ref().and_then(subject_sigma);

        Ok(SubjectGrids {
            mean_grid,
            sigma_grid,
            sigma,
        })
    }

    /// Process one subject end to end, persisting intermediates when enabled
    pub fn process_subject(&self, subject: &SubjectEntry) -> SubjectOutcome {
        let _span = tracing::info_span!("subject", id = %subject.id).entered();
        let mut outcome = SubjectOutcome {
            id: subject.id.clone(),
            repetitions: Vec::with_capacity(subject.repetitions.len()),
            repetitions_used: 0,
            shape: None,
            sigma: None,
            sigma_cells: 0,
            failures: Vec::new(),
        };

        let (composites, names) = self.collect_composites(subject, &mut outcome);
        if composites.is_empty() {
            let error = ReproError::empty(format!("{} (no valid repetition)", subject.id));
            outcome.failures.push(UnitFailure::new(subject.id.label(), &error));
            return outcome;
        }
        tracing::debug!("{}: averaging {}", subject.id, names.join(", "));

        let count = composites.len();
        let grids = match self.reduce_subject(composites) {
            Ok(grids) => grids,
            Err(e) => {
                outcome.failures.push(UnitFailure::new(subject.id.label(), &e));
                return outcome;
            }
        };

        outcome.repetitions_used = count;
        outcome.shape = Some(grids.mean_grid.shape());

        if self.config.write_outputs {
            if let Err(e) = self.store.save_grid(&subject.mean_path(), &grids.mean_grid) {
                outcome.failures.push(UnitFailure::new(subject.id.label(), &e));
            }
        }

        match (&grids.sigma_grid, grids.sigma) {
            (Some(sigma_grid), Some(sigma)) => {
                outcome.sigma = Some(sigma);
                outcome.sigma_cells = sigma_grid.defined_count();
                tracing::info!(
                    "{}: Sigma_k = {:.6} over {} cells, {} repetitions",
                    subject.id,
                    sigma,
                    outcome.sigma_cells,
                    count
                );
            }
            (sigma_grid, _) => {
                // Fewer than two repetitions overall, or no cell with two
                let found = if sigma_grid.is_some() { 0 } else { count };
                let error = ReproError::InsufficientSample { required: 2, found };
                outcome.failures.push(UnitFailure::new(subject.id.label(), &error));
            }
        }

        outcome
    }

    fn collect_composites(
        &self,
        subject: &SubjectEntry,
        outcome: &mut SubjectOutcome,
    ) -> (Vec<Grid>, Vec<String>) {
        let mut composites = Vec::with_capacity(subject.repetitions.len());
        let mut names = Vec::with_capacity(subject.repetitions.len());

        for repetition in &subject.repetitions {
            let unit = format!("{}/{}", subject.id, repetition.name);
            let mut summary = RepetitionSummary {
                name: repetition.name.clone(),
                scans_listed: repetition.scans.len(),
                scans_used: 0,
                composite_built: false,
            };

            match self.build_composite(&subject.id, repetition, &mut outcome.failures) {
                Ok((composite, used)) => {
                    summary.scans_used = used;
                    summary.composite_built = true;

                    if self.config.write_outputs {
                        if let Err(e) =
                            self.store.save_grid(&repetition.composite_path(), &composite)
                        {
                            outcome.failures.push(UnitFailure::new(&unit, &e));
                        }
                    }

                    composites.push(composite);
                    names.push(repetition.name.clone());
                }
                Err(e) => outcome.failures.push(UnitFailure::new(&unit, &e)),
            }

            outcome.repetitions.push(summary);
        }

        (composites, names)
    }

    /// Report one cell's repetition values and local dispersion
    ///
    /// Builds the composites without persisting anything.
    pub fn inspect_point(
        &self,
        subject: &SubjectEntry,
        row: usize,
        col: usize,
    ) -> Result<PointInspection> {
        let mut failures = Vec::new();
        let mut composites = Vec::new();
        let mut repetitions = Vec::new();

        for repetition in &subject.repetitions {
            match self.build_composite(&subject.id, repetition, &mut failures) {
                Ok((composite, _)) => {
                    composites.push(composite);
                    repetitions.push(repetition.name.clone());
                }
                Err(e) => failures.push(UnitFailure::new(
                    format!("{}/{}", subject.id, repetition.name),
                    &e,
                )),
            }
        }

        let sample = SubjectRepetitions::new(composites)?.point_sample(row, col)?;
        Ok(PointInspection {
            subject: subject.id.clone(),
            repetitions,
            sample,
        })
    }

    /// Run every subject of the manifest, then aggregate and validate
    pub fn run(&self, manifest: &DatasetManifest) -> RunReport {
        tracing::info!(
            "Processing {} subjects ({} scan files)",
            manifest.subjects.len(),
            manifest.scan_count()
        );

        let subjects = self.process_all(&manifest.subjects);
        let sample: PopulationSample = subjects
            .iter()
            .filter_map(|outcome| outcome.sigma.map(|sigma| (outcome.id.clone(), sigma)))
            .collect();

        let mut report = RunReport {
            subjects,
            sample,
            population: None,
            population_scaled: None,
            verdict: None,
            failures: Vec::new(),
        };

        if manifest.partial {
            tracing::debug!(
                "Filtered run; {} left untouched",
                manifest.population_path().display()
            );
        } else if self.config.write_outputs && !report.sample.is_empty() {
            let csv = CsvPopulationOutput::from_sample(&report.sample).to_csv();
            if let Err(e) = self.store.save_table(&manifest.population_path(), &csv) {
                report.failures.push(UnitFailure::new("population", &e));
            }
        }

        let population = match aggregate(&report.sample) {
            Ok(population) => population,
            Err(e) => {
                report.failures.push(UnitFailure::new("population", &e));
                return report;
            }
        };

        let scaled = population.summary.scaled(self.config.unit_scale);
        report.population = Some(population);
        report.population_scaled = Some(scaled);

        match HypothesisValidator::from_config(self.config).and_then(|v| v.validate(&scaled)) {
            Ok(verdict) => report.verdict = Some(verdict),
            Err(e) => report.failures.push(UnitFailure::new("population", &e)),
        }

        report
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, subjects: &[SubjectEntry]) -> Vec<SubjectOutcome> {
        use rayon::prelude::*;

        if self.config.parallel {
            // Collecting from an indexed iterator keeps manifest order
            subjects
                .par_iter()
                .map(|subject| self.process_subject(subject))
                .collect()
        } else {
            subjects
                .iter()
                .map(|subject| self.process_subject(subject))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, subjects: &[SubjectEntry]) -> Vec<SubjectOutcome> {
        subjects
            .iter()
            .map(|subject| self.process_subject(subject))
            .collect()
    }
}
