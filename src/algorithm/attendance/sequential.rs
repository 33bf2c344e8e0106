//! Sequential classification
//!
//! Single-threaded path used when one thread is requested. Rows are
//! visited in source order, so no reordering is needed afterwards.

use super::classifier::{AttendanceClassifier, ClassificationResult};
use super::rows::AttendanceRows;
use log::debug;

/// Classify every row on the calling thread
#[must_use]
pub fn classify_sequential(
    rows: &AttendanceRows,
    classifier: &AttendanceClassifier<'_>,
) -> Vec<ClassificationResult> {
    debug!("Using sequential processing for {} rows", rows.len());
    rows.rows.iter().map(|row| classifier.classify(row)).collect()
}
