// Single-cycle tree inspection
//
// Runs one planning cycle against a fixed wall scene and dumps the tree,
// the extracted path, and a top-down plot.

use nalgebra::Vector3;

use local_avoidance::utils::visualization::plot_tree_top_down;
use local_avoidance::{CostParameters, PointCloud, StarPlanner, StarPlannerConfig};

fn main() {
    println!("Tree snapshot start!!");

    // dense wall across the corridor, gap to the right
    let mut cloud = PointCloud::new();
    let mut x = -5.0;
    while x <= 1.0 {
        let mut z = 0.5;
        while z <= 4.0 {
            cloud.push(Vector3::new(x, 4.0, z));
            z += 0.25;
        }
        x += 0.25;
    }
    println!("Scene cloud: {} points", cloud.len());

    let start = Vector3::new(0.0, 0.0, 2.0);
    let goal = Vector3::new(0.0, 10.0, 2.0);

    let config = StarPlannerConfig::default();
    config.validate().expect("invalid planner configuration");

    let mut planner = StarPlanner::new(config, CostParameters::default());
    planner.set_pose(start, Vector3::zeros(), 0.0);
    planner.set_goal(goal);
    planner.set_pointcloud(cloud.clone());
    planner.build_look_ahead_tree();

    let tree = planner.tree();
    println!(
        "Tree: {} nodes, {} expanded, {} path nodes",
        tree.nodes.len(),
        tree.closed_set.len(),
        tree.path_node_positions.len()
    );
    for (j, p) in tree.path_node_positions.iter().enumerate() {
        println!("node {} : [ {:.2}, {:.2}, {:.2} ]", j, p.x, p.y, p.z);
    }

    std::fs::create_dir_all("img").ok();
    match plot_tree_top_down(tree, &cloud, &start, &goal, "img/tree_snapshot.png") {
        Ok(()) => println!("Plot saved to img/tree_snapshot.png"),
        Err(e) => println!("Plot skipped: {}", e),
    }

    println!("Tree snapshot finish!!");
}
