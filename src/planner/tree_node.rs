//! Search tree vertex

use nalgebra::Vector3;

/// One vertex of the lookahead search tree.
///
/// Nodes live in the planner's append-only `Vec` for exactly one planning
/// cycle; `parent` indexes into that Vec and the root points at itself.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Index of the node this one was expanded from
    pub parent: usize,
    /// Distance from the root in tree edges
    pub depth: u32,
    /// World-frame position [m]
    pub position: Vector3<f64>,
    /// World-frame velocity [m/s]
    pub velocity: Vector3<f64>,
    /// Heading into this node, histogram frame [deg]
    pub yaw_deg: f64,
    /// Accumulated path cost including one forward-looking heuristic term
    pub total_cost: f64,
    /// Straight-line distance to the goal [m]
    pub heuristic: f64,
    /// Closed nodes are never re-expanded or re-selected
    pub closed: bool,
}

impl TreeNode {
    pub fn new(parent: usize, depth: u32, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        TreeNode {
            parent,
            depth,
            position,
            velocity,
            yaw_deg: 0.0,
            total_cost: 0.0,
            heuristic: 0.0,
            closed: false,
        }
    }

    pub fn set_costs(&mut self, heuristic: f64, total_cost: f64) {
        self.heuristic = heuristic;
        self.total_cost = total_cost;
    }
}
