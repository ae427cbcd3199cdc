//! Dataset manifest
//!
//! A typed listing of subjects, each with its ordered repetitions, each with
//! its ordered angle-scan handles. The pipeline consumes the manifest and
//! never looks at folder names itself. A manifest is either discovered from
//! the on-disk convention or loaded from a TOML file:
//!
//! ```text
//! <root>/batch_<id>/dsi/dsi_01..dsi_07/<scan files>.csv
//! <root>/batch_<id>/dsi/dsi_0N/min_composite_dsi_0N.csv   (written)
//! <root>/batch_<id>/dsi/dsi_mean_<id>.csv                  (written)
//! <root>/resultats_population.csv                          (written)
//! ```

use crate::config::ReproConfig;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Folder name prefix of a subject
pub const SUBJECT_PREFIX: &str = "batch_";

/// Name of the per-subject folder holding the repetitions
pub const REPETITIONS_DIR: &str = "dsi";

/// File name prefix of written angle composites
pub const COMPOSITE_PREFIX: &str = "min_composite";

/// File name of the population export
pub const POPULATION_FILE: &str = "resultats_population.csv";

/// Id used when a folder name carries no trailing number
pub const UNKNOWN_ID: &str = "unknown";

/// Subject identity: folder label plus its numeric id
///
/// `batch_001` has id `001`. A label without a trailing `_<digits>` segment
/// gets the id `unknown` instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SubjectId {
    label: String,
    id: String,
}

impl SubjectId {
    pub fn parse(label: impl Into<String>) -> Self {
        static TRAILING_ID: OnceLock<Option<Regex>> = OnceLock::new();
        let label = label.into();

        let id = TRAILING_ID
            .get_or_init(|| Regex::new(r"_(\d+)$").ok())
            .as_ref()
            .and_then(|pattern| pattern.captures(&label))
            .and_then(|caps| caps.get(1))
            .map_or_else(|| UNKNOWN_ID.to_string(), |m| m.as_str().to_string());

        Self { label, id }
    }

    /// Folder label, e.g. `batch_001`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Numeric id, e.g. `001`, or `unknown`
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<String> for SubjectId {
    fn from(label: String) -> Self {
        Self::parse(label)
    }
}

impl From<SubjectId> for String {
    fn from(subject: SubjectId) -> Self {
        subject.label
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Opaque handle to one stored angle scan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanHandle(PathBuf);

impl ScanHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ScanHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One repetition: a folder of angle scans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionEntry {
    /// Folder name, e.g. `dsi_03`
    pub name: String,
    pub dir: PathBuf,
    #[serde(default)]
    pub scans: Vec<ScanHandle>,
}

impl RepetitionEntry {
    /// Where this repetition's angle composite is written
    pub fn composite_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", COMPOSITE_PREFIX, self.name))
    }
}

/// One subject with its repetitions in acquisition order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectEntry {
    #[serde(rename = "label")]
    pub id: SubjectId,
    pub dsi_root: PathBuf,
    #[serde(default, rename = "repetition")]
    pub repetitions: Vec<RepetitionEntry>,
}

impl SubjectEntry {
    /// Where this subject's mean grid is written
    pub fn mean_path(&self) -> PathBuf {
        self.dsi_root.join(format!("dsi_mean_{}.csv", self.id.id()))
    }
}

/// Every subject of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub root: PathBuf,
    #[serde(default, rename = "subject")]
    pub subjects: Vec<SubjectEntry>,
    /// Set once subjects were filtered out; the population table is then
    /// left untouched
    #[serde(skip)]
    pub partial: bool,
}

impl DatasetManifest {
    /// Walk `<root>/batch_*` following the folder convention
    ///
    /// Subjects are sorted by folder name. A subject without a `dsi` folder
    /// is kept with no repetitions so the run reports it. Repetition folders
    /// `dsi_01..dsi_NN` are probed in order; absent ones are logged and
    /// skipped.
    pub fn discover<P: AsRef<Path>>(root: P, config: &ReproConfig) -> Result<Self> {
        let root = root.as_ref();
        let mut subject_dirs: Vec<(String, PathBuf)> = fs::read_dir(root)
            .with_context(|| format!("Failed to read dataset root: {}", root.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.starts_with(SUBJECT_PREFIX)
                    .then(|| (name, entry.path()))
            })
            .collect();
        subject_dirs.sort();

        tracing::info!(
            "Discovered {} subject folders under {}",
            subject_dirs.len(),
            root.display()
        );

        let subjects = subject_dirs
            .into_iter()
            .map(|(name, dir)| discover_subject(SubjectId::parse(name), &dir, config))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root: root.to_path_buf(),
            subjects,
            partial: false,
        })
    }

    /// Load an explicit manifest from TOML
    ///
    /// # Example TOML
    /// ```toml
    /// root = "/data/batch"
    ///
    /// [[subject]]
    /// label = "batch_001"
    /// dsi_root = "/data/batch/batch_001/dsi"
    ///
    /// [[subject.repetition]]
    /// name = "dsi_01"
    /// dir = "/data/batch/batch_001/dsi/dsi_01"
    /// scans = ["/data/batch/batch_001/dsi/dsi_01/scan_1.csv"]
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read manifest file: {}", path.as_ref().display())
        })?;
        toml::from_str(&content).context("Failed to parse TOML manifest")
    }

    /// Keep only the subject with this id or label, marking the manifest
    /// partial
    pub fn retain_subject(&mut self, wanted: &str) {
        self.subjects
            .retain(|subject| subject.id.id() == wanted || subject.id.label() == wanted);
        self.partial = true;
    }

    /// Where the population table is written
    pub fn population_path(&self) -> PathBuf {
        self.root.join(POPULATION_FILE)
    }

    /// Total number of scan handles across all subjects
    pub fn scan_count(&self) -> usize {
        self.subjects
            .iter()
            .flat_map(|subject| &subject.repetitions)
            .map(|repetition| repetition.scans.len())
            .sum()
    }
}

fn discover_subject(id: SubjectId, dir: &Path, config: &ReproConfig) -> Result<SubjectEntry> {
    let dsi_root = dir.join(REPETITIONS_DIR);
    let mut repetitions = Vec::new();

    if !dsi_root.is_dir() {
        tracing::warn!("'{}' folder not found in {}", REPETITIONS_DIR, id);
        return Ok(SubjectEntry {
            id,
            dsi_root,
            repetitions,
        });
    }

    for index in 1..=config.nominal_repetitions {
        let name = format!("{}_{:02}", REPETITIONS_DIR, index);
        let rep_dir = dsi_root.join(&name);

        if !rep_dir.is_dir() {
            tracing::warn!("{}: repetition folder {} missing", id, name);
            continue;
        }

        let scans = discover_scans(&rep_dir)?;
        if scans.len() != config.nominal_angles {
            tracing::debug!(
                "{}/{}: {} scan files (nominal {})",
                id,
                name,
                scans.len(),
                config.nominal_angles
            );
        }

        repetitions.push(RepetitionEntry {
            name,
            dir: rep_dir,
            scans,
        });
    }

    Ok(SubjectEntry {
        id,
        dsi_root,
        repetitions,
    })
}

/// Angle scans of one repetition folder, sorted by file name
///
/// Files named `scan_*.csv` take precedence; otherwise every `.csv` except
/// previously written composites is a scan.
fn discover_scans(dir: &Path) -> Result<Vec<ScanHandle>> {
    let mut csv_files: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read repetition folder: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.to_ascii_lowercase()
                .ends_with(".csv")
                .then(|| (name, entry.path()))
        })
        .collect();
    csv_files.sort();

    let named_scans: Vec<&(String, PathBuf)> = csv_files
        .iter()
        .filter(|(name, _)| name.starts_with("scan_"))
        .collect();

    let selected: Vec<ScanHandle> = if named_scans.is_empty() {
        csv_files
            .iter()
            .filter(|(name, _)| !name.contains(COMPOSITE_PREFIX))
            .map(|(_, path)| ScanHandle::new(path))
            .collect()
    } else {
        named_scans
            .into_iter()
            .map(|(_, path)| ScanHandle::new(path))
            .collect()
    };

    Ok(selected)
}
