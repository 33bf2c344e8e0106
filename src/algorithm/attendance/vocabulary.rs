//! Clinical code vocabularies for avoidable attendance classification
//!
//! Codes are sourced from NHS Digital. Every code is held as literal text:
//! several carry leading zeros and SNOMED concept ids do not fit in 64 bits.

use crate::error::{AttendanceError, Result};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Type 1 emergency department
const ED_TYPE: &[&str] = &["01", "1"];
/// First attendance
const ATTENDANCE_CATEGORY: &[&str] = &["1", "01"];

/// Discharged with GP follow-up, discharged without follow-up,
/// left before being treated
const SNOMED_DISPOSAL: &[&str] = &["1077021000000100", "182992009", "1066321000000107"];
/// Non-ambulance arrivals
const SNOMED_ARRIVAL_MODE: &[&str] = &[
    "1048071000000103",
    "1048061000000105",
    "1047991000000102",
    "1048001000000106",
];
/// Urinalysis, pregnancy test, dental investigation, none
const SNOMED_INVESTIGATION: &[&str] = &[
    "27171005",
    "167252002",
    "67900009",
    "53115007",
    "1088291000000101",
];
/// Written guidance, dental treatment, prescription medicines, none
const SNOMED_TREATMENT: &[&str] = &["413334001", "81733005", "266712008", "183964008"];

const HES_DISPOSAL: &[&str] = &["02", "2", "03", "3", "12"];
/// Ambulance arrival, matched with negated polarity
const HES_ARRIVAL_MODE: &[&str] = &["1"];
/// Urinalysis, pregnancy test, dental investigation, none
const HES_INVESTIGATION: &[&str] = &["06", "6", "21", "22", "24"];
/// Written and verbal guidance, vital signs, dental treatment, prescriptions
/// (07 is the deprecated prescriptions code), none
const HES_TREATMENT: &[&str] = &["221", "222", "30", "56", "57", "99", "07", "7"];

/// Clinical coding standard of the attendance data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodingStandard {
    /// Emergency Care Data Set SNOMED CT codes
    Snomed,
    /// Hospital Episode Statistics A&E codes
    Hes,
}

impl CodingStandard {
    /// Whether arrival mode terms list the codes to exclude.
    ///
    /// SNOMED lists the qualifying non-ambulance arrivals directly; HES lists
    /// only the ambulance code, so a match there means "not ambulance".
    #[must_use]
    pub const fn negate_arrival_mode(self) -> bool {
        matches!(self, Self::Hes)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snomed => "snomed",
            Self::Hes => "hes",
        }
    }
}

impl FromStr for CodingStandard {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "snomed" => Ok(Self::Snomed),
            "hes" => Ok(Self::Hes),
            _ => Err(AttendanceError::InvalidCodingStandard(s.to_string())),
        }
    }
}

impl fmt::Display for CodingStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unordered set of literal codes for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: FxHashSet<String>,
}

impl TermSet {
    /// Exact string match against the set
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.terms.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&[&str]> for TermSet {
    fn from(codes: &[&str]) -> Self {
        codes.iter().copied().collect()
    }
}

/// The six term sets used by the classification rules, together with the
/// standard that fixes arrival mode polarity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub standard: CodingStandard,
    pub ed_type: TermSet,
    pub attendance_category: TermSet,
    pub disposal: TermSet,
    pub arrival_mode: TermSet,
    pub investigation: TermSet,
    pub treatment: TermSet,
}

/// On-disk layout of a versioned vocabulary override
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularyFile {
    #[serde(default)]
    ed_type: Option<Vec<String>>,
    #[serde(default)]
    attendance_category: Option<Vec<String>>,
    disposal: Vec<String>,
    arrival_mode: Vec<String>,
    investigation: Vec<String>,
    treatment: Vec<String>,
}

impl Vocabulary {
    /// Resolve the built-in term sets for a coding standard
    #[must_use]
    pub fn resolve(standard: CodingStandard) -> Self {
        let (disposal, arrival_mode, investigation, treatment) = match standard {
            CodingStandard::Snomed => (
                SNOMED_DISPOSAL,
                SNOMED_ARRIVAL_MODE,
                SNOMED_INVESTIGATION,
                SNOMED_TREATMENT,
            ),
            CodingStandard::Hes => (
                HES_DISPOSAL,
                HES_ARRIVAL_MODE,
                HES_INVESTIGATION,
                HES_TREATMENT,
            ),
        };

        Self {
            standard,
            ed_type: TermSet::from(ED_TYPE),
            attendance_category: TermSet::from(ATTENDANCE_CATEGORY),
            disposal: TermSet::from(disposal),
            arrival_mode: TermSet::from(arrival_mode),
            investigation: TermSet::from(investigation),
            treatment: TermSet::from(treatment),
        }
    }

    /// Parse a vocabulary override from JSON text.
    ///
    /// Codes must be JSON strings, so `"01"` can never be read back as `1`.
    pub fn from_json_str(standard: CodingStandard, json: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        let vocabulary = Self {
            standard,
            ed_type: file
                .ed_type
                .map_or_else(|| TermSet::from(ED_TYPE), TermSet::from_iter),
            attendance_category: file
                .attendance_category
                .map_or_else(|| TermSet::from(ATTENDANCE_CATEGORY), TermSet::from_iter),
            disposal: file.disposal.into_iter().collect(),
            arrival_mode: file.arrival_mode.into_iter().collect(),
            investigation: file.investigation.into_iter().collect(),
            treatment: file.treatment.into_iter().collect(),
        };

        // HES arrival mode is negated: an empty set would make every arrival qualify
        if standard.negate_arrival_mode() && vocabulary.arrival_mode.is_empty() {
            return Err(AttendanceError::Vocabulary(format!(
                "arrival_mode must list the excluded code(s) for {standard}"
            )));
        }

        Ok(vocabulary)
    }

    /// Load a vocabulary override from a JSON file
    pub fn from_json_file(standard: CodingStandard, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(standard, &json).map_err(|e| match e {
            AttendanceError::Json(err) => AttendanceError::Vocabulary(format!(
                "failed to parse {}: {err}",
                path.display()
            )),
            other => other,
        })
    }
}
