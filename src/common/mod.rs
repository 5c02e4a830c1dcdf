//! Common types and error definitions for local_avoidance
//!
//! This module provides the foundational building blocks used across
//! the histogram, cost, and planner modules.

pub mod types;
pub mod error;

pub use types::*;
pub use error::*;
