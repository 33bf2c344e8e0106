//! Parallel classification
//!
//! Rows are split into one contiguous chunk per worker on a dedicated Rayon
//! pool. Each worker writes into the slots matching its own rows of a
//! pre-sized buffer, so no locking is needed; the buffer is then sorted by
//! row identifier so that the output order never depends on scheduling.

use super::classifier::{AttendanceClassifier, ClassificationResult};
use super::rows::AttendanceRows;
use crate::error::Result;
use log::debug;
use rayon::prelude::*;

/// Classify rows on a pool of `n_threads` workers.
///
/// `n_threads` must be at least 2; the caller routes single-thread runs to the
/// sequential path.
pub fn classify_parallel(
    rows: &AttendanceRows,
    classifier: &AttendanceClassifier<'_>,
    n_threads: usize,
) -> Result<Vec<ClassificationResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("attendance-worker-{i}"))
        .build()?;

    let n_rows = rows.len();
    let chunk_size = n_rows.div_ceil(n_threads).max(1);
    debug!("Using parallel processing with {n_threads} threads, chunk size {chunk_size}");

    let mut results = vec![ClassificationResult::default(); n_rows];

    pool.install(|| {
        results
            .par_chunks_mut(chunk_size)
            .zip(rows.rows.par_chunks(chunk_size))
            .for_each(|(slots, chunk)| {
                for (slot, row) in slots.iter_mut().zip(chunk) {
                    *slot = classifier.classify(row);
                }
            });

        reconcile_order(&mut results);
    });

    Ok(results)
}

/// Restore ascending identifier order
pub fn reconcile_order(results: &mut [ClassificationResult]) {
    results.par_sort_unstable_by_key(|r| r.id);
}
