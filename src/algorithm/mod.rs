//! Classification algorithms

pub mod attendance;
