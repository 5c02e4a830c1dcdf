// Closed-loop local avoidance demo
//
// A drone flies from start to goal through two offset walls. Every cycle
// it re-plans a lookahead tree from a range-limited snapshot of the noisy
// obstacle cloud and steps along the resulting path.

use nalgebra::Vector3;
use rand::prelude::*;
use rand_distr::Normal;

use plotlib::page::Page;
use plotlib::repr::Plot;
use plotlib::style::LineStyle;
use plotlib::style::PointStyle;
use plotlib::view::ContinuousView;

use local_avoidance::{CostParameters, PointCloud, StarPlanner, StarPlannerConfig};

const SENSOR_RANGE_M: f64 = 15.0;
const STEP_M: f64 = 0.5;
const GOAL_RADIUS_M: f64 = 0.8;
const MAX_CYCLES: usize = 150;

/// Scatter a vertical wall into noisy cloud points, the way a depth
/// sensor would see it.
fn scatter_wall(
    cloud: &mut PointCloud,
    rng: &mut StdRng,
    noise: &Normal<f64>,
    x_min: f64,
    x_max: f64,
    y: f64,
    z_min: f64,
    z_max: f64,
) {
    let mut x = x_min;
    while x <= x_max {
        let mut z = z_min;
        while z <= z_max {
            cloud.push(Vector3::new(
                x + noise.sample(rng),
                y + noise.sample(rng),
                z + noise.sample(rng),
            ));
            z += 0.25;
        }
        x += 0.25;
    }
}

fn main() {
    println!("Lookahead planning demo start!!");

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.05).unwrap();

    // two walls with gaps on opposite sides force an S-shaped route
    let mut world = PointCloud::new();
    scatter_wall(&mut world, &mut rng, &noise, -4.0, 2.0, 6.0, 0.5, 4.0);
    scatter_wall(&mut world, &mut rng, &noise, -2.0, 5.0, 12.0, 0.5, 4.0);
    println!("World cloud: {} points", world.len());

    let start = Vector3::new(0.0, 0.0, 2.0);
    let goal = Vector3::new(0.0, 18.0, 2.0);

    let config = StarPlannerConfig::default();
    config.validate().expect("invalid planner configuration");
    let mut planner = StarPlanner::new(config, CostParameters::default());
    planner.set_goal(goal);

    let mut position = start;
    let mut velocity = Vector3::zeros();
    let mut yaw_deg = 90.0;
    let mut trajectory = vec![(position.x, position.y)];
    let mut reached = false;

    for cycle in 0..MAX_CYCLES {
        let snapshot = world.within_range(&position, SENSOR_RANGE_M);
        planner.set_pose(position, velocity, yaw_deg);
        planner.set_pointcloud(snapshot);
        planner.build_look_ahead_tree();

        let path = planner.path_node_positions();
        if path.len() < 2 {
            println!("cycle {}: no safe progress possible, holding position", cycle);
            break;
        }

        let direction = (path[1] - position).normalize();
        position += direction * STEP_M;
        velocity = direction * STEP_M;
        yaw_deg = direction.y.atan2(direction.x).to_degrees();
        trajectory.push((position.x, position.y));

        let to_goal = (goal - position).norm();
        if cycle % 10 == 0 {
            println!(
                "cycle {}: position [{:.1}, {:.1}, {:.1}], {:.1}m to goal",
                cycle, position.x, position.y, position.z, to_goal
            );
        }
        if to_goal <= GOAL_RADIUS_M {
            println!("Goal reached after {} cycles!!", cycle + 1);
            reached = true;
            break;
        }
    }
    if !reached {
        println!("Stopped {:.1}m from the goal", (goal - position).norm());
    }

    let obstacle_points: Vec<(f64, f64)> = world.iter().map(|p| (p.x, p.y)).collect();
    let s0: Plot = Plot::new(obstacle_points).point_style(PointStyle::new().colour("#000000").size(1.5));
    let s1: Plot = Plot::new(trajectory).line_style(LineStyle::new().colour("#35C788").width(2.));
    let s2: Plot = Plot::new(vec![(start.x, start.y), (goal.x, goal.y)])
        .point_style(PointStyle::new().colour("#DD3355").size(4.));

    let v = ContinuousView::new()
        .add(s0)
        .add(s1)
        .add(s2)
        .x_range(-8., 8.)
        .y_range(-1., 19.)
        .x_label("x [m]")
        .y_label("y [m]");

    std::fs::create_dir_all("img").ok();
    Page::single(&v).save("./img/lookahead_demo.svg").unwrap();
    println!("Trajectory saved to ./img/lookahead_demo.svg");

    println!("Lookahead planning demo finish!!");
}
