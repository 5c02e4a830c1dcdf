//! Visualization utilities for local_avoidance
//!
//! Top-down (XY) rendering of a planning cycle using gnuplot: obstacle
//! cloud, lookahead tree edges, extracted path, start and goal markers.
//! The vertical axis is dropped; the plots are meant for quick inspection
//! of the search behavior, not for 3D analysis.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};
use nalgebra::Vector3;

use crate::common::{PlannerError, PlannerResult, PointCloud};
use crate::planner::SearchTree;

/// Color palette for consistent styling
pub mod colors {
    pub const OBSTACLE: &str = "#000000";
    pub const TREE: &str = "#AAAAAA";
    pub const PATH: &str = "#FF0000";
    pub const START: &str = "#00AA00";
    pub const GOAL: &str = "#0000FF";
}

/// Save a top-down plot of one planning cycle as a PNG.
pub fn plot_tree_top_down(
    tree: &SearchTree,
    cloud: &PointCloud,
    start: &Vector3<f64>,
    goal: &Vector3<f64>,
    filename: &str,
) -> PlannerResult<()> {
    let ox: Vec<f64> = cloud.iter().map(|p| p.x).collect();
    let oy: Vec<f64> = cloud.iter().map(|p| p.y).collect();
    let px: Vec<f64> = tree.path_node_positions.iter().map(|p| p.x).collect();
    let py: Vec<f64> = tree.path_node_positions.iter().map(|p| p.y).collect();

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Lookahead tree", &[])
            .set_x_label("X [m]", &[])
            .set_y_label("Y [m]", &[])
            .set_aspect_ratio(AutoOption::Fix(1.0));

        if !ox.is_empty() {
            axes.points(
                &ox,
                &oy,
                &[
                    Caption("Obstacles"),
                    Color(colors::OBSTACLE),
                    PointSymbol('S'),
                    PointSize(0.5),
                ],
            );
        }

        // tree edges, one short segment per node
        let mut first_edge = true;
        for node in tree.nodes.iter().skip(1) {
            let parent = &tree.nodes[node.parent];
            let caption = if first_edge { "Tree" } else { "" };
            first_edge = false;
            axes.lines(
                &[parent.position.x, node.position.x],
                &[parent.position.y, node.position.y],
                &[Caption(caption), Color(colors::TREE), LineWidth(0.5)],
            );
        }

        if px.len() > 1 {
            axes.lines(&px, &py, &[Caption("Path"), Color(colors::PATH), LineWidth(2.0)]);
        }

        axes.points(
            &[start.x],
            &[start.y],
            &[Caption("Start"), Color(colors::START), PointSymbol('O'), PointSize(1.5)],
        );
        axes.points(
            &[goal.x],
            &[goal.y],
            &[Caption("Goal"), Color(colors::GOAL), PointSymbol('O'), PointSize(1.5)],
        );
    }

    fg.save_to_png(filename, 800, 600)
        .map_err(|e| PlannerError::VisualizationError(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_hex() {
        for c in [colors::OBSTACLE, colors::TREE, colors::PATH, colors::START, colors::GOAL] {
            assert!(c.starts_with('#'));
            assert_eq!(c.len(), 7);
        }
    }
}
