//! repro-sigma - reproducibility validation for repeated depth-scan grids
//!
//! Each subject is scanned from several angles, several times. The angle
//! scans of one repetition are merged into a minimum composite, the
//! composites of one subject give a per-cell mean and sample standard
//! deviation, and the mean of that sigma grid is the subject's Sigma_k.
//! Across subjects, a one-sided Student t-test decides whether the
//! population reproducibility is below a tolerance threshold.
//!
//! ```
//! use repro_sigma::grid::Grid;
//! use repro_sigma::reduce::{subject_sigma, SubjectRepetitions};
//!
//! let reps = SubjectRepetitions::new(vec![
//!     Grid::from_rows(vec![vec![Some(10.0), None]]).unwrap(),
//!     Grid::from_rows(vec![vec![Some(12.0), Some(3.0)]]).unwrap(),
//! ])
//! .unwrap();
//! let sigma = reps.sigma_grid().unwrap();
//! assert_eq!(sigma.get(0, 1), None);
//! assert!((subject_sigma(&sigma).unwrap() - 2.0f64.sqrt()).abs() < 1e-12);
//! ```

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod grid;
pub mod json_output;
pub mod manifest;
pub mod pipeline;
pub mod population;
pub mod reduce;
pub mod report;
pub mod stats;
pub mod store;
pub mod validation;
