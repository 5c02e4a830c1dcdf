//! Per-direction traversal cost
//!
//! The cost of stepping along a candidate direction is a weighted sum of
//! three terms: angular offset to the goal direction, angular offset to
//! the current velocity direction, and obstacle proximity in the
//! candidate's histogram cell.

use nalgebra::Vector3;

use crate::common::PolarPoint;
use crate::histogram::polar_histogram::FREE_CELL_DIST;
use crate::histogram::transforms::{angle_difference_deg, cartesian_to_polar_histogram};

/// Directions with an obstacle closer than this are untraversable [m].
pub const MIN_OBSTACLE_CLEARANCE_M: f64 = 0.5;

/// Named weights for the per-direction cost terms.
#[derive(Debug, Clone, Copy)]
pub struct CostParameters {
    /// Weight of the angular offset to the goal direction
    pub goal_weight: f64,
    /// Weight of the angular offset to the current velocity direction
    pub smooth_weight: f64,
    /// Weight of the obstacle proximity term
    pub obstacle_weight: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            goal_weight: 5.0,
            smooth_weight: 1.5,
            obstacle_weight: 8.0,
        }
    }
}

/// Squared angular offset between two directions, normalized so a full
/// half-turn counts as 1 per axis.
fn angular_offset_sq(candidate: &PolarPoint, facing: &PolarPoint) -> f64 {
    let dz = angle_difference_deg(candidate.z, facing.z) / 180.0;
    let de = angle_difference_deg(candidate.e, facing.e) / 180.0;
    dz * dz + de * de
}

/// Traversal cost of stepping along `candidate` from `position`.
///
/// `obstacle_distance` is the histogram range in the candidate's cell,
/// [`FREE_CELL_DIST`] when the cell is free. Occupied directions cost
/// inversely with range and become infinite inside
/// [`MIN_OBSTACLE_CLEARANCE_M`].
pub fn edge_cost(
    candidate: &PolarPoint,
    obstacle_distance: f64,
    goal: &Vector3<f64>,
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    params: &CostParameters,
) -> f64 {
    let obstacle_cost = if obstacle_distance != FREE_CELL_DIST {
        if obstacle_distance <= MIN_OBSTACLE_CLEARANCE_M {
            return f64::INFINITY;
        }
        params.obstacle_weight / obstacle_distance
    } else {
        0.0
    };

    let facing_goal = cartesian_to_polar_histogram(goal, position);
    let goal_cost = params.goal_weight * angular_offset_sq(candidate, &facing_goal);

    let smooth_cost = if velocity.norm() > 1e-6 {
        let ahead = position + velocity;
        let facing_velocity = cartesian_to_polar_histogram(&ahead, position);
        params.smooth_weight * angular_offset_sq(candidate, &facing_velocity)
    } else {
        0.0
    };

    goal_cost + smooth_cost + obstacle_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_ahead() -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        // position at origin, goal 10m along +y, hovering
        (
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::zeros(),
            Vector3::zeros(),
        )
    }

    #[test]
    fn test_goal_aligned_direction_is_cheapest() {
        let (goal, position, velocity) = goal_ahead();
        let params = CostParameters::default();
        let aligned = PolarPoint::new(0.0, 0.0, 1.0);
        let sideways = PolarPoint::new(0.0, 90.0, 1.0);
        let backwards = PolarPoint::new(0.0, 180.0, 1.0);

        let c_aligned = edge_cost(&aligned, FREE_CELL_DIST, &goal, &position, &velocity, &params);
        let c_side = edge_cost(&sideways, FREE_CELL_DIST, &goal, &position, &velocity, &params);
        let c_back = edge_cost(&backwards, FREE_CELL_DIST, &goal, &position, &velocity, &params);

        assert!(c_aligned < c_side);
        assert!(c_side < c_back);
    }

    #[test]
    fn test_closer_obstacle_costs_more() {
        let (goal, position, velocity) = goal_ahead();
        let params = CostParameters::default();
        let candidate = PolarPoint::new(0.0, 0.0, 1.0);

        let far = edge_cost(&candidate, 10.0, &goal, &position, &velocity, &params);
        let near = edge_cost(&candidate, 1.0, &goal, &position, &velocity, &params);
        let free = edge_cost(&candidate, FREE_CELL_DIST, &goal, &position, &velocity, &params);

        assert!(free < far);
        assert!(far < near);
    }

    #[test]
    fn test_obstacle_inside_clearance_is_infinite() {
        let (goal, position, velocity) = goal_ahead();
        let params = CostParameters::default();
        let candidate = PolarPoint::new(0.0, 0.0, 1.0);
        let cost = edge_cost(
            &candidate,
            MIN_OBSTACLE_CLEARANCE_M * 0.5,
            &goal,
            &position,
            &velocity,
            &params,
        );
        assert!(cost.is_infinite());
    }

    #[test]
    fn test_smoothness_penalizes_turning() {
        let goal = Vector3::new(0.0, 10.0, 0.0);
        let position = Vector3::zeros();
        // currently moving along +x, i.e. azimuth 90
        let velocity = Vector3::new(2.0, 0.0, 0.0);
        let params = CostParameters {
            goal_weight: 0.0,
            smooth_weight: 1.0,
            obstacle_weight: 0.0,
        };

        let straight = PolarPoint::new(0.0, 90.0, 1.0);
        let turn = PolarPoint::new(0.0, -90.0, 1.0);
        let c_straight = edge_cost(&straight, FREE_CELL_DIST, &goal, &position, &velocity, &params);
        let c_turn = edge_cost(&turn, FREE_CELL_DIST, &goal, &position, &velocity, &params);
        assert!(c_straight < c_turn);
    }

    #[test]
    fn test_hover_has_no_smoothness_term() {
        let (goal, position, _) = goal_ahead();
        let params = CostParameters {
            goal_weight: 0.0,
            smooth_weight: 10.0,
            obstacle_weight: 0.0,
        };
        let candidate = PolarPoint::new(0.0, 135.0, 1.0);
        let cost = edge_cost(
            &candidate,
            FREE_CELL_DIST,
            &goal,
            &position,
            &Vector3::zeros(),
            &params,
        );
        assert_eq!(cost, 0.0);
    }
}
