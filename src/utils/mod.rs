//! Utility modules for local_avoidance

pub mod visualization;

pub use visualization::*;
