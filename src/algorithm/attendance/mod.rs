//! Avoidable emergency department attendances
//!
//! This module implements the ScHARR avoidable attendance definition over
//! Arrow record batches coded in either SNOMED CT or HES A&E codes. It
//! includes:
//!
//! 1. Coding standard vocabularies
//! 2. Per-field term matching and flag reduction
//! 3. Row extraction from named string columns
//! 4. Sequential and parallel classification with a stable output order

pub mod classifier;
pub mod parallel;
pub mod predicate;
pub mod rows;
pub mod sequential;
pub mod vocabulary;

pub use classifier::{AttendanceClassifier, AttendanceFlags, ClassificationResult};
pub use predicate::{BoolOp, reduce_bools, string_in_terms};
pub use rows::{AttendanceRow, AttendanceRows, RowLayout, extract_rows};
pub use vocabulary::{CodingStandard, TermSet, Vocabulary};

use crate::config::{AttendanceColumns, ClassifierConfig, validate_threads, warn_if_oversubscribed};
use crate::error::{AttendanceError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};
use arrow::array::BooleanArray;
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use std::sync::Arc;
use std::time::Instant;

/// Default name of the verdict column appended to output batches
pub const DEFAULT_VERDICT_COLUMN: &str = "avoidable_attendance";

/// Classify extracted rows with `n_threads` workers.
///
/// The result holds one entry per row, ordered by identifier.
pub fn classify_all(
    rows: &AttendanceRows,
    vocabulary: &Vocabulary,
    n_threads: usize,
) -> Result<Vec<ClassificationResult>> {
    validate_threads(n_threads)?;
    let classifier = AttendanceClassifier::new(vocabulary, rows.layout);

    if n_threads == 1 {
        Ok(sequential::classify_sequential(rows, &classifier))
    } else {
        parallel::classify_parallel(rows, &classifier, n_threads)
    }
}

/// Classify every attendance in `batch`.
///
/// Configuration is validated and all columns are resolved before any row
/// is classified. Returns one verdict per row in source order.
pub fn classify(batch: &RecordBatch, config: &ClassifierConfig) -> Result<Vec<bool>> {
    let vocabulary = config.resolve_vocabulary()?;
    warn_if_oversubscribed(config.n_threads);

    let start = Instant::now();
    log_operation_start("Extracting attendance rows", batch.num_rows());
    let rows = extract_rows(batch, &config.columns)?;
    log_operation_complete("extracted", rows.len(), Some(start.elapsed()));

    let start = Instant::now();
    log_operation_start(
        &format!("Classifying {} attendances", vocabulary.standard),
        rows.len(),
    );
    let results = classify_all(&rows, &vocabulary, config.n_threads)?;
    log_operation_complete("classified", results.len(), Some(start.elapsed()));

    debug_assert!(
        results
            .iter()
            .enumerate()
            .all(|(i, r)| r.id == i as u64 + 1)
    );

    let verdicts: Vec<bool> = results.into_iter().map(|r| r.avoidable).collect();
    info!(
        "{} of {} attendances are avoidable",
        verdicts.iter().filter(|&&v| v).count(),
        verdicts.len()
    );
    Ok(verdicts)
}

/// Classify attendances spread over several batches sharing one schema.
///
/// Identifiers run across batches in order, so the result lines up with the
/// concatenation of `batches`.
pub fn classify_batches(batches: &[RecordBatch], config: &ClassifierConfig) -> Result<Vec<bool>> {
    match combine_batches(batches)? {
        Some(combined) => classify(&combined, config),
        None => {
            config.resolve_vocabulary()?;
            log_warning("No record batches to classify", None);
            Ok(Vec::new())
        }
    }
}

/// Merge batches sharing one schema into a single batch.
///
/// A lone batch is returned without copying its columns. Returns `None` when
/// there are no batches.
pub fn combine_batches(batches: &[RecordBatch]) -> Result<Option<RecordBatch>> {
    match batches {
        [] => Ok(None),
        [single] => Ok(Some(single.clone())),
        [first, ..] => Ok(Some(concat_batches(&first.schema(), batches)?)),
    }
}

/// Classify with explicit arguments rather than a [`ClassifierConfig`]
#[allow(clippy::too_many_arguments)]
pub fn derive_avoidable_attendances(
    batch: &RecordBatch,
    col_type_ed: &str,
    col_discharge: &str,
    col_category: &str,
    col_arrival_mode: &str,
    cols_investigations: &[&str],
    cols_treatments: &[&str],
    coding_standard: &str,
    n_threads: usize,
) -> Result<Vec<bool>> {
    let columns = AttendanceColumns::new(col_type_ed, col_discharge, col_category, col_arrival_mode)
        .with_investigations(cols_investigations.iter().copied())
        .with_treatments(cols_treatments.iter().copied());
    let config = ClassifierConfig::new(columns)
        .with_coding_standard(coding_standard)
        .with_threads(n_threads);
    classify(batch, &config)
}

/// Append the verdicts to `batch` as a non-nullable Boolean column
pub fn with_verdict_column(
    batch: &RecordBatch,
    verdicts: Vec<bool>,
    column_name: &str,
) -> Result<RecordBatch> {
    if batch.schema().index_of(column_name).is_ok() {
        return Err(AttendanceError::Arrow(
            arrow::error::ArrowError::SchemaError(format!(
                "column '{column_name}' already exists"
            )),
        ));
    }

    let schema = batch.schema();
    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new(column_name, DataType::Boolean, false)));
    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());

    let mut columns = batch.columns().to_vec();
    columns.push(Arc::new(BooleanArray::from(verdicts)));

    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
