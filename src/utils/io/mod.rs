//! IO utilities for Parquet input and output

pub mod parquet;

pub use parquet::{read_parquet, write_parquet};
