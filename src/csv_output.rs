//! CSV export of the population sample
//!
//! One row per subject with a defined score, the label always written next
//! to its own Sigma_k.

use crate::population::PopulationSample;

/// CSV record for one subject
#[derive(Debug, Clone)]
pub struct CsvSubject {
    pub batch: String,
    pub sigma_k: f64,
}

/// Population CSV formatter (`Batch,Sigma_k`)
#[derive(Debug, Default)]
pub struct CsvPopulationOutput {
    subjects: Vec<CsvSubject>,
}

impl CsvPopulationOutput {
    /// Create an empty formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Build rows from a population sample, preserving its order
    pub fn from_sample(sample: &PopulationSample) -> Self {
        Self {
            subjects: sample
                .scores()
                .iter()
                .map(|score| CsvSubject {
                    batch: score.subject.label().to_string(),
                    sigma_k: score.sigma,
                })
                .collect(),
        }
    }

    /// Add a subject row
    pub fn add_subject(&mut self, subject: CsvSubject) {
        self.subjects.push(subject);
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Generate CSV output as string
    ///
    /// Scores use the shortest representation that parses back to the same
    /// value, so the export is byte-for-byte reproducible.
    pub fn to_csv(&self) -> String {
        let mut output = String::from("Batch,Sigma_k\n");

        for subject in &self.subjects {
            output.push_str(&Self::escape_field(&subject.batch));
            output.push(',');
            output.push_str(&subject.sigma_k.to_string());
            output.push('\n');
        }

        output
    }
}
