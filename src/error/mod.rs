//! Error handling for avoidable attendance classification.
//!
//! Every variant except the wrapped I/O and decoding errors is a configuration
//! error: it is raised before any row is classified, and no partial results
//! are ever returned alongside it.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;

/// Errors raised while configuring or running a classification
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// The clinical coding standard is neither `snomed` nor `hes`
    #[error("invalid clinical coding standard '{0}': must be snomed or hes")]
    InvalidCodingStandard(String),

    /// A named column does not exist in the source
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A named column exists but does not hold strings
    #[error("column '{column}' (index {index}) must be string type, found {data_type}")]
    ColumnType {
        column: String,
        index: usize,
        data_type: DataType,
    },

    /// Thread count below one
    #[error("thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    /// A vocabulary file could not be used
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON decoding error for configuration or vocabulary files
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker pool could not be started
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl AttendanceError {
    /// Whether this error stems from invalid configuration rather than I/O
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCodingStandard(_)
                | Self::ColumnNotFound { .. }
                | Self::ColumnType { .. }
                | Self::InvalidThreadCount(_)
                | Self::Vocabulary(_)
        )
    }
}

/// Result type for classification operations
pub type Result<T> = std::result::Result<T, AttendanceError>;
