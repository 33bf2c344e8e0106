//! Utility functions shared by the classifier and the command line tool

pub mod io;
pub mod logging;
pub mod parallelism;
