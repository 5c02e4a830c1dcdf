//! local_avoidance - reactive local obstacle avoidance for aerial vehicles
//!
//! This crate implements the local-motion-planning core of an autonomous
//! vehicle flying through a partially known, obstacle-dense environment.
//! Each sensor cycle it turns the current pose, a goal, and a 3D point
//! cloud into a short lookahead path via a best-first tree search over a
//! polar obstacle histogram.

// Core modules
pub mod common;
pub mod utils;

// Pipeline modules
pub mod histogram;
pub mod cost;
pub mod planner;

// Re-export common types for convenience
pub use common::{PlannerError, PlannerResult, PointCloud, PolarPoint};
pub use cost::{CandidateDirection, CostParameters};
pub use histogram::{generate_histogram, PolarHistogram, HISTOGRAM_BIN_DEG};
pub use planner::{SearchTree, StarPlanner, StarPlannerConfig, TreeNode};
