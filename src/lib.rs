//! Classify emergency department attendances as avoidable.
//!
//! Records are read from named string columns of an Arrow record batch and
//! classified under either the SNOMED CT (ECDS) or HES A&E coding standard.
//! Classification can run on any number of threads and always returns one
//! verdict per record in source order.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::attendance::{
    AttendanceClassifier, AttendanceFlags, AttendanceRow, AttendanceRows, BoolOp,
    ClassificationResult, CodingStandard, DEFAULT_VERDICT_COLUMN, RowLayout, TermSet, Vocabulary,
    classify, classify_all, classify_batches, combine_batches, derive_avoidable_attendances, extract_rows,
    reduce_bools, string_in_terms, with_verdict_column,
};
pub use config::{AttendanceColumns, ClassifierConfig};
pub use error::{AttendanceError, Result};
pub use utils::parallelism::available_parallelism;

// Arrow types
pub use arrow::record_batch::RecordBatch;
