//! Logging utilities
//!
//! This module provides consistent start/complete messages for long-running
//! operations.

pub mod log;

pub use log::{log_operation_complete, log_operation_start, log_warning};
