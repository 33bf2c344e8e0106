//! Per-row avoidable attendance rules
//!
//! A row is avoidable when every one of six category flags holds:
//!
//! 1. ED type is a type 1 department
//! 2. disposal is a discharge or left-before-treatment code
//! 3. category is a first attendance
//! 4. arrival mode is not an ambulance arrival
//! 5. no investigation column holds a code outside the investigation terms
//! 6. no treatment column holds a code outside the treatment terms
//!
//! Missing values fail flags 1 to 4 and are ignored by flags 5 and 6.

use super::predicate::{BoolOp, reduce_bools, string_in_terms};
use super::rows::{ARRIVAL_MODE, AttendanceRow, CATEGORY, DISPOSAL, RowLayout, TYPE_ED};
use super::vocabulary::{TermSet, Vocabulary};

/// Verdict for one attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    /// Identifier of the source row
    pub id: u64,
    /// Whether the attendance is avoidable
    pub avoidable: bool,
}

/// Intermediate flags of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceFlags {
    pub type_ed: bool,
    pub disposal: bool,
    pub category: bool,
    pub arrival_mode: bool,
    pub investigations: bool,
    pub treatments: bool,
}

impl AttendanceFlags {
    #[must_use]
    pub fn verdict(&self) -> bool {
        reduce_bools(
            BoolOp::And,
            [
                self.type_ed,
                self.disposal,
                self.category,
                self.arrival_mode,
                self.investigations,
                self.treatments,
            ],
        )
        .unwrap_or(true)
    }
}

/// Applies a vocabulary to rows of a fixed layout
#[derive(Debug, Clone, Copy)]
pub struct AttendanceClassifier<'a> {
    vocabulary: &'a Vocabulary,
    layout: RowLayout,
}

impl<'a> AttendanceClassifier<'a> {
    #[must_use]
    pub const fn new(vocabulary: &'a Vocabulary, layout: RowLayout) -> Self {
        Self { vocabulary, layout }
    }

    /// Evaluate the six category flags of a row
    #[must_use]
    pub fn flags(&self, row: &AttendanceRow) -> AttendanceFlags {
        let vocab = self.vocabulary;
        AttendanceFlags {
            type_ed: string_in_terms(row.get(TYPE_ED), &vocab.ed_type, false, false),
            disposal: string_in_terms(row.get(DISPOSAL), &vocab.disposal, false, false),
            category: string_in_terms(row.get(CATEGORY), &vocab.attendance_category, false, false),
            arrival_mode: string_in_terms(
                row.get(ARRIVAL_MODE),
                &vocab.arrival_mode,
                false,
                vocab.standard.negate_arrival_mode(),
            ),
            investigations: group_flag(row.investigations(self.layout), &vocab.investigation),
            treatments: group_flag(row.treatments(self.layout), &vocab.treatment),
        }
    }

    /// Classify a single row
    #[inline]
    #[must_use]
    pub fn classify(&self, row: &AttendanceRow) -> ClassificationResult {
        ClassificationResult {
            id: row.id,
            avoidable: self.flags(row).verdict(),
        }
    }
}

/// True unless some column holds a present code outside `terms`.
///
/// Each column is flagged when it holds an unrecognised code; the group flag
/// is the negated OR of those. An empty group has no such column and is true.
fn group_flag<'r>(values: impl Iterator<Item = Option<&'r str>>, terms: &TermSet) -> bool {
    let unrecognised = reduce_bools(
        BoolOp::Or,
        values.map(|value| string_in_terms(value, terms, false, true)),
    );
    !unrecognised.unwrap_or(false)
}
