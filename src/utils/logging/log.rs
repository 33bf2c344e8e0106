//! Logging utilities
//!
//! This module provides standardized logging functions for operations.

use std::fmt::Display;
use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items about to be processed
pub fn log_operation_start(operation: &str, items: usize) {
    log::info!("{operation} ({items} records)");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense description of the operation
/// * `items` - Number of items processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, items: usize, elapsed: Option<Duration>) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} records in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} records");
    }
}

/// Log a warning about an input that yields nothing to classify
///
/// `subject` names the input, such as a file path.
pub fn log_warning(message: &str, subject: Option<&dyn Display>) {
    match subject {
        Some(subject) => log::warn!("{message} ({subject})"),
        None => log::warn!("{message}"),
    }
}
