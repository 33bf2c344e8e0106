//! Configuration for avoidable attendance classification.

use crate::algorithm::attendance::vocabulary::{CodingStandard, Vocabulary};
use crate::error::{AttendanceError, Result};
use crate::utils::parallelism::available_parallelism;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the columns holding each attendance field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceColumns {
    /// Emergency department type
    pub type_ed: String,
    /// Attendance discharge (disposal)
    pub discharge: String,
    /// Attendance category
    pub category: String,
    /// Arrival mode
    pub arrival_mode: String,
    /// Investigation columns, in order
    #[serde(default)]
    pub investigations: Vec<String>,
    /// Treatment columns, in order
    #[serde(default)]
    pub treatments: Vec<String>,
}

impl AttendanceColumns {
    #[must_use]
    pub fn new(
        type_ed: impl Into<String>,
        discharge: impl Into<String>,
        category: impl Into<String>,
        arrival_mode: impl Into<String>,
    ) -> Self {
        Self {
            type_ed: type_ed.into(),
            discharge: discharge.into(),
            category: category.into(),
            arrival_mode: arrival_mode.into(),
            investigations: Vec::new(),
            treatments: Vec::new(),
        }
    }

    /// Set the investigation columns
    #[must_use]
    pub fn with_investigations<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.investigations = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the treatment columns
    #[must_use]
    pub fn with_treatments<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.treatments = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Column names in row order: the four fixed fields, then investigations,
    /// then treatments
    pub fn ordered_names(&self) -> impl Iterator<Item = &str> {
        [
            self.type_ed.as_str(),
            self.discharge.as_str(),
            self.category.as_str(),
            self.arrival_mode.as_str(),
        ]
        .into_iter()
        .chain(self.investigations.iter().map(String::as_str))
        .chain(self.treatments.iter().map(String::as_str))
    }
}

fn default_coding_standard() -> String {
    CodingStandard::Snomed.as_str().to_string()
}

const fn default_threads() -> usize {
    1
}

/// Configuration for one classification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Source column names
    pub columns: AttendanceColumns,
    /// Clinical coding standard, `snomed` or `hes` in any case
    #[serde(default = "default_coding_standard")]
    pub coding_standard: String,
    /// Number of worker threads, at least 1
    #[serde(default = "default_threads")]
    pub n_threads: usize,
    /// Optional JSON vocabulary replacing the built-in term sets
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Create a configuration with the SNOMED standard and a single thread
    #[must_use]
    pub fn new(columns: AttendanceColumns) -> Self {
        Self {
            columns,
            coding_standard: default_coding_standard(),
            n_threads: default_threads(),
            vocabulary_path: None,
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    #[must_use]
    pub fn with_coding_standard(mut self, standard: impl Into<String>) -> Self {
        self.coding_standard = standard.into();
        self
    }

    #[must_use]
    pub const fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    #[must_use]
    pub fn with_vocabulary_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary_path = Some(path.into());
        self
    }

    /// Run every check that does not need the data source.
    ///
    /// Returns the parsed coding standard.
    pub fn validate(&self) -> Result<CodingStandard> {
        let standard = self.coding_standard.parse::<CodingStandard>()?;
        validate_threads(self.n_threads)?;
        Ok(standard)
    }

    /// Validate and resolve the vocabulary for this run
    pub fn resolve_vocabulary(&self) -> Result<Vocabulary> {
        let standard = self.validate()?;
        match &self.vocabulary_path {
            Some(path) => Vocabulary::from_json_file(standard, path),
            None => Ok(Vocabulary::resolve(standard)),
        }
    }
}

/// Reject a thread count below one
pub fn validate_threads(n_threads: usize) -> Result<()> {
    if n_threads < 1 {
        return Err(AttendanceError::InvalidThreadCount(n_threads));
    }
    Ok(())
}

/// Warn when more threads are requested than the host reports
pub fn warn_if_oversubscribed(n_threads: usize) {
    let available = available_parallelism();
    if n_threads > available {
        warn!("Requested {n_threads} threads but host reports {available} available");
    }
}
