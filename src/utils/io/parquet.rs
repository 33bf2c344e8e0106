//! Parquet file operations
//!
//! This module reads attendance extracts into Arrow record batches and writes
//! classified batches back out.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;
use crate::utils::logging::log_warning;

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("PARQUET_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
///
/// # Returns
/// The record batches in file order
pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log::info!("Reading parquet file {}", path.display());

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE))
        .build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    if batches.is_empty() {
        log_warning("Parquet file contains no record batches", Some(&path.display()));
    }

    log::info!(
        "Read {} rows in {} batches from {} in {:?}",
        batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
        batches.len(),
        path.display(),
        start.elapsed()
    );
    Ok(batches)
}

/// Write a record batch to a new parquet file, replacing any existing file
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}
