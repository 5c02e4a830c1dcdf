//! Best-first lookahead tree search
//!
//! The planner grows a tree of candidate positions out of the vehicle's
//! current pose, one histogram-and-cost evaluation per expanded node, and
//! extracts a short-horizon path by backtracking from the cheapest
//! frontier node. The search is greedy over the whole open set, so a
//! deeper but cheaper branch preempts a shallow expensive one.
//!
//! One call to [`StarPlanner::build_look_ahead_tree`] is one planning
//! cycle: it observes an immutable snapshot of the inputs, runs to
//! completion, and replaces the previous cycle's tree wholesale.

use std::time::Instant;

use log::{debug, trace};
use nalgebra::Vector3;

use crate::common::{PlannerError, PlannerResult, PointCloud};
use crate::cost::{best_candidates, build_cost_matrix, edge_cost, CostParameters};
use crate::histogram::{
    fcu_yaw_to_histogram_frame_deg, generate_histogram, polar_histogram_to_cartesian,
    polar_to_histogram_index, wrap_angle_to_plus_minus_180, HISTOGRAM_BIN_DEG,
};
use crate::planner::tree_node::TreeNode;

/// Children closer than this to any existing tree node are rejected [m].
///
/// Suppressing near-duplicate branches is what bounds tree growth when
/// neighboring candidate directions converge to the same region.
pub const NODE_MERGE_RADIUS_M: f64 = 0.2;

/// `tree_age` sentinel marking the cached tree as stale after a goal change.
pub const TREE_AGE_STALE: u32 = 1000;

/// Search knobs. Changes take effect on the next planning cycle.
#[derive(Debug, Clone, Copy)]
pub struct StarPlannerConfig {
    /// Children accepted per expanded node
    pub children_per_node: usize,
    /// Expansion budget per cycle
    pub n_expanded_nodes: usize,
    /// Step distance between a node and its children [m]
    pub tree_node_distance: f64,
    /// Nodes beyond this distance from the start are never expanded [m]
    pub max_path_length: f64,
    /// Angular margin of the cost-field smoothing [deg]
    pub smoothing_margin_deg: f64,
}

impl Default for StarPlannerConfig {
    fn default() -> Self {
        Self {
            children_per_node: 8,
            n_expanded_nodes: 40,
            tree_node_distance: 1.0,
            max_path_length: 15.0,
            smoothing_margin_deg: 30.0,
        }
    }
}

impl StarPlannerConfig {
    /// Reject configurations under which every cycle would degenerate to a
    /// single-point path. The planner itself never checks this; callers
    /// that want loud failures do.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.children_per_node == 0 {
            return Err(PlannerError::InvalidParameter(
                "children_per_node must be positive".to_string(),
            ));
        }
        if self.n_expanded_nodes == 0 {
            return Err(PlannerError::InvalidParameter(
                "n_expanded_nodes must be positive".to_string(),
            ));
        }
        if self.tree_node_distance <= 0.0 {
            return Err(PlannerError::InvalidParameter(
                "tree_node_distance must be positive".to_string(),
            ));
        }
        if self.max_path_length <= 0.0 {
            return Err(PlannerError::InvalidParameter(
                "max_path_length must be positive".to_string(),
            ));
        }
        if self.smoothing_margin_deg < 0.0 {
            return Err(PlannerError::InvalidParameter(
                "smoothing_margin_deg must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable snapshot of one planning cycle's inputs.
///
/// Assembled at the start of the cycle so that no setter can perturb an
/// expansion in progress.
struct CycleInput<'a> {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    yaw_histogram_frame_deg: f64,
    goal: Vector3<f64>,
    cloud: &'a PointCloud,
    config: StarPlannerConfig,
    cost_params: CostParameters,
}

/// Result of one expansion cycle: the full tree plus the extracted path.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    /// Append-only node storage; index 0 is the root
    pub nodes: Vec<TreeNode>,
    /// Indices of expanded (closed) nodes, in expansion order
    pub closed_set: Vec<usize>,
    /// Path positions ordered root -> destination
    pub path_node_positions: Vec<Vector3<f64>>,
    /// Tree indices of the path positions, same order
    pub path_node_indices: Vec<usize>,
}

/// Reactive local planner around the lookahead tree search.
///
/// The caller drives it strictly sequentially: update inputs through the
/// setters, then run [`build_look_ahead_tree`](Self::build_look_ahead_tree)
/// and read the resulting path. No internal synchronization is provided.
pub struct StarPlanner {
    config: StarPlannerConfig,
    cost_params: CostParameters,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    yaw_histogram_frame_deg: f64,
    goal: Vector3<f64>,
    cloud: PointCloud,
    tree_age: u32,
    tree: SearchTree,
}

impl StarPlanner {
    pub fn new(config: StarPlannerConfig, cost_params: CostParameters) -> Self {
        Self {
            config,
            cost_params,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            yaw_histogram_frame_deg: 0.0,
            goal: Vector3::zeros(),
            cloud: PointCloud::new(),
            tree_age: 0,
            tree: SearchTree::default(),
        }
    }

    /// Store the vehicle state. `yaw_fcu_deg` is given in the FCU body
    /// convention and remapped into the histogram frame.
    pub fn set_pose(&mut self, position: Vector3<f64>, velocity: Vector3<f64>, yaw_fcu_deg: f64) {
        self.position = position;
        self.velocity = velocity;
        self.yaw_histogram_frame_deg = fcu_yaw_to_histogram_frame_deg(yaw_fcu_deg);
    }

    /// Store the goal and mark the cached tree as stale.
    pub fn set_goal(&mut self, goal: Vector3<f64>) {
        self.goal = goal;
        self.tree_age = TREE_AGE_STALE;
    }

    /// Store the latest obstacle cloud snapshot. An empty cloud is legal.
    pub fn set_pointcloud(&mut self, cloud: PointCloud) {
        self.cloud = cloud;
    }

    /// Update the cost weight bundle; next cycle only.
    pub fn set_params(&mut self, cost_params: CostParameters) {
        self.cost_params = cost_params;
    }

    /// Update the search knobs; next cycle only.
    pub fn set_search_config(&mut self, config: StarPlannerConfig) {
        self.config = config;
    }

    /// Cycles since the tree was last rebuilt, or [`TREE_AGE_STALE`] after
    /// a goal change.
    pub fn tree_age(&self) -> u32 {
        self.tree_age
    }

    /// Consumer-side staleness tick for cycles that reuse the cached tree.
    pub fn age_tree(&mut self) {
        self.tree_age = self.tree_age.saturating_add(1);
    }

    /// The tree and path of the most recent cycle.
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Path of the most recent cycle, ordered root -> destination.
    pub fn path_node_positions(&self) -> &[Vector3<f64>] {
        &self.tree.path_node_positions
    }

    /// Run one complete planning cycle.
    ///
    /// Always produces a path; with a blocked root or a non-positive
    /// budget the path degenerates to the single root position, which the
    /// caller must treat as "no safe progress possible".
    pub fn build_look_ahead_tree(&mut self) {
        let started = Instant::now();
        let input = CycleInput {
            position: self.position,
            velocity: self.velocity,
            yaw_histogram_frame_deg: self.yaw_histogram_frame_deg,
            goal: self.goal,
            cloud: &self.cloud,
            config: self.config,
            cost_params: self.cost_params,
        };
        let tree = grow_search_tree(&input);
        debug!(
            "[SP] tree ({} nodes, {} path nodes, {} expanded) calculated in {:.2}ms",
            tree.nodes.len(),
            tree.path_node_positions.len(),
            tree.closed_set.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        for (j, p) in tree.path_node_positions.iter().enumerate() {
            trace!("[SP] node {} : [ {:.2}, {:.2}, {:.2} ]", j, p.x, p.y, p.z);
        }
        self.tree = tree;
        self.tree_age = 0;
    }
}

fn tree_heuristic(goal: &Vector3<f64>, position: &Vector3<f64>) -> f64 {
    (goal - position).norm()
}

/// Heading of a step direction in the histogram frame.
///
/// A direction with no horizontal component carries no heading
/// information; the caller passes the origin's heading as the fallback.
fn heading_from_direction(direction: &Vector3<f64>, fallback_deg: f64) -> f64 {
    if direction.x.abs() < 1e-9 && direction.y.abs() < 1e-9 {
        return fallback_deg;
    }
    let yaw_deg = direction.y.atan2(direction.x).to_degrees();
    wrap_angle_to_plus_minus_180((-yaw_deg).round() + 90.0)
}

/// One complete best-first expansion cycle as a pure function of its
/// snapshot.
fn grow_search_tree(input: &CycleInput<'_>) -> SearchTree {
    let config = &input.config;
    let mut nodes: Vec<TreeNode> = Vec::new();
    let mut closed_set: Vec<usize> = Vec::new();

    let mut root = TreeNode::new(0, 0, input.position, input.velocity);
    let root_heuristic = tree_heuristic(&input.goal, &input.position);
    root.set_costs(root_heuristic, root_heuristic);
    root.yaw_deg = input.yaw_histogram_frame_deg;
    nodes.push(root);

    let mut origin = 0usize;
    let mut is_expanded_node = true;

    for _ in 0..config.n_expanded_nodes {
        if !is_expanded_node {
            break;
        }
        let origin_position = nodes[origin].position;
        let origin_velocity = nodes[origin].velocity;

        let histogram = generate_histogram(input.cloud, &origin_position);
        let cost_matrix = build_cost_matrix(
            &histogram,
            &input.goal,
            &origin_position,
            &origin_velocity,
            &input.cost_params,
            config.smoothing_margin_deg,
        );
        let candidates = best_candidates(&cost_matrix, config.children_per_node);

        if candidates.is_empty() {
            // dead end: keep the node closed and unattractive
            nodes[origin].total_cost = f64::INFINITY;
        } else {
            let depth = nodes[origin].depth + 1;
            let parent_velocity = nodes[nodes[origin].parent].velocity;
            let mut children = 0usize;
            for candidate in &candidates {
                let candidate_polar = candidate.to_polar(config.tree_node_distance);
                let node_location = polar_histogram_to_cartesian(&candidate_polar, &origin_position);
                let node_velocity = parent_velocity + (node_location - origin_position);

                let close_node_exists = nodes
                    .iter()
                    .any(|n| (n.position - node_location).norm() < NODE_MERGE_RADIUS_M);

                if children < config.children_per_node && !close_node_exists {
                    let mut node = TreeNode::new(origin, depth, node_location, node_velocity);
                    let heuristic = tree_heuristic(&input.goal, &node_location);
                    let (e_idx, z_idx) = polar_to_histogram_index(&candidate_polar, HISTOGRAM_BIN_DEG);
                    let obstacle_distance = histogram.get_dist(e_idx, z_idx);
                    let cost = edge_cost(
                        &candidate_polar,
                        obstacle_distance,
                        &input.goal,
                        &node_location,
                        &node_velocity,
                        &input.cost_params,
                    );
                    node.heuristic = heuristic;
                    // cost to reach the origin (net of its heuristic, which
                    // would otherwise compound across depth) plus the new
                    // edge plus one fresh heuristic term
                    node.total_cost =
                        nodes[origin].total_cost - nodes[origin].heuristic + cost + heuristic;
                    node.yaw_deg = heading_from_direction(
                        &(node_location - origin_position),
                        nodes[origin].yaw_deg,
                    );
                    nodes.push(node);
                    children += 1;
                }
            }
        }

        closed_set.push(origin);
        nodes[origin].closed = true;

        // cheapest open node within the search radius of the start
        let mut minimal_cost = f64::INFINITY;
        is_expanded_node = false;
        for (i, node) in nodes.iter().enumerate() {
            if !node.closed {
                let node_distance = (node.position - input.position).norm();
                if node.total_cost < minimal_cost && node_distance < config.max_path_length {
                    minimal_cost = node.total_cost;
                    origin = i;
                    is_expanded_node = true;
                }
            }
        }
    }

    // backtrack from the best frontier node to the root
    let mut path_node_positions = Vec::new();
    let mut path_node_indices = Vec::new();
    let mut tree_end = origin;
    while tree_end > 0 {
        path_node_indices.push(tree_end);
        path_node_positions.push(nodes[tree_end].position);
        tree_end = nodes[tree_end].parent;
    }
    path_node_indices.push(0);
    path_node_positions.push(nodes[0].position);
    path_node_positions.reverse();
    path_node_indices.reverse();

    SearchTree {
        nodes,
        closed_set,
        path_node_positions,
        path_node_indices,
    }
}
