// Best-first lookahead tree planner module

pub mod star_planner;
pub mod tree_node;

pub use star_planner::*;
pub use tree_node::*;
