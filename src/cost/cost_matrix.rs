//! Cost-field assembly and candidate extraction
//!
//! The cost matrix shares the histogram's angular discretization: one cost
//! per (elevation, azimuth) cell. After assembly the matrix is smoothed so
//! that expensive directions inflate their angular neighborhood, which
//! keeps the search away from obstacle edges.

use itertools::iproduct;
use nalgebra::{DMatrix, Vector3};
use ordered_float::OrderedFloat;

use crate::common::PolarPoint;
use crate::cost::cost_function::{edge_cost, CostParameters};
use crate::histogram::polar_histogram::PolarHistogram;
use crate::histogram::transforms::histogram_index_to_polar;

/// A proposed heading extracted from the cost matrix, not yet materialized
/// as a tree node.
#[derive(Debug, Clone, Copy)]
pub struct CandidateDirection {
    pub cost: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl CandidateDirection {
    pub fn to_polar(&self, radius: f64) -> PolarPoint {
        PolarPoint::new(self.elevation_deg, self.azimuth_deg, radius)
    }
}

/// Cost per angular cell for stepping away from `origin_position`.
pub fn build_cost_matrix(
    histogram: &PolarHistogram,
    goal: &Vector3<f64>,
    origin_position: &Vector3<f64>,
    origin_velocity: &Vector3<f64>,
    params: &CostParameters,
    smoothing_margin_deg: f64,
) -> DMatrix<f64> {
    let n_e = histogram.n_elevation();
    let n_z = histogram.n_azimuth();
    let mut matrix = DMatrix::from_element(n_e, n_z, 0.0);

    for (e_idx, z_idx) in iproduct!(0..n_e, 0..n_z) {
        let candidate = histogram_index_to_polar(e_idx, z_idx, histogram.bin_deg(), 1.0);
        let obstacle_distance = histogram.get_dist(e_idx, z_idx);
        matrix[(e_idx, z_idx)] = edge_cost(
            &candidate,
            obstacle_distance,
            goal,
            origin_position,
            origin_velocity,
            params,
        );
    }

    smooth_cost_matrix(&mut matrix, histogram.bin_deg(), smoothing_margin_deg);
    matrix
}

/// Separable triangular inflation over the angular grid.
///
/// Each cell keeps its own cost and additionally collects a linearly
/// decaying share of its neighbors' costs out to `smoothing_margin_deg`.
/// Azimuth wraps around, elevation clamps at the poles. A cell's cost
/// never decreases, so a blocked (infinite) direction blocks its whole
/// kernel neighborhood.
pub fn smooth_cost_matrix(matrix: &mut DMatrix<f64>, bin_deg: f64, smoothing_margin_deg: f64) {
    let radius = (smoothing_margin_deg / bin_deg) as isize;
    if radius <= 0 {
        return;
    }
    let n_e = matrix.nrows() as isize;
    let n_z = matrix.ncols() as isize;
    let weight = |k: isize| (radius + 1 - k.abs()) as f64 / (radius + 1) as f64;

    // azimuth pass, wrapping
    let src = matrix.clone();
    for (e, z) in iproduct!(0..n_e, 0..n_z) {
        let mut acc = src[(e as usize, z as usize)];
        for k in 1..=radius {
            let left = (z - k).rem_euclid(n_z);
            let right = (z + k).rem_euclid(n_z);
            acc += weight(k) * (src[(e as usize, left as usize)] + src[(e as usize, right as usize)]);
        }
        matrix[(e as usize, z as usize)] = acc;
    }

    // elevation pass, clamping
    let src = matrix.clone();
    for (e, z) in iproduct!(0..n_e, 0..n_z) {
        let mut acc = src[(e as usize, z as usize)];
        for k in 1..=radius {
            let below = (e - k).max(0);
            let above = (e + k).min(n_e - 1);
            acc += weight(k) * (src[(below as usize, z as usize)] + src[(above as usize, z as usize)]);
        }
        matrix[(e as usize, z as usize)] = acc;
    }
}

/// Up to `children_per_node` candidate directions, cheapest first.
///
/// Cells with infinite cost are untraversable and never proposed. Ties are
/// broken by cell index so repeated calls rank identically.
pub fn best_candidates(matrix: &DMatrix<f64>, children_per_node: usize) -> Vec<CandidateDirection> {
    let n_e = matrix.nrows();
    let n_z = matrix.ncols();
    let bin_deg = 180.0 / n_e as f64;

    let mut cells: Vec<(usize, usize, f64)> = iproduct!(0..n_e, 0..n_z)
        .map(|(e, z)| (e, z, matrix[(e, z)]))
        .filter(|&(_, _, cost)| cost.is_finite())
        .collect();
    cells.sort_by_key(|&(e, z, cost)| (OrderedFloat(cost), e, z));
    cells.truncate(children_per_node);

    cells
        .into_iter()
        .map(|(e, z, cost)| {
            let polar = histogram_index_to_polar(e, z, bin_deg, 1.0);
            CandidateDirection {
                cost,
                elevation_deg: polar.e,
                azimuth_deg: polar.z,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PointCloud;
    use crate::histogram::polar_histogram::{generate_histogram, HISTOGRAM_BIN_DEG};

    fn free_space_matrix() -> DMatrix<f64> {
        let histogram = generate_histogram(&PointCloud::new(), &Vector3::zeros());
        build_cost_matrix(
            &histogram,
            &Vector3::new(0.0, 10.0, 0.0),
            &Vector3::zeros(),
            &Vector3::zeros(),
            &CostParameters::default(),
            30.0,
        )
    }

    #[test]
    fn test_candidates_sorted_ascending() {
        let matrix = free_space_matrix();
        let candidates = best_candidates(&matrix, 10);
        assert_eq!(candidates.len(), 10);
        for pair in candidates.windows(2) {
            assert!(pair[0].cost <= pair[1].cost);
        }
    }

    #[test]
    fn test_best_candidate_points_at_goal() {
        let matrix = free_space_matrix();
        let best = best_candidates(&matrix, 1)[0];
        // goal along +y: azimuth 0, elevation 0, so the best cell center
        // is within one bin of it
        assert!(best.azimuth_deg.abs() <= HISTOGRAM_BIN_DEG);
        assert!(best.elevation_deg.abs() <= HISTOGRAM_BIN_DEG);
    }

    #[test]
    fn test_zero_branching_factor_gives_no_candidates() {
        let matrix = free_space_matrix();
        assert!(best_candidates(&matrix, 0).is_empty());
    }

    #[test]
    fn test_infinite_cells_are_never_proposed() {
        let mut matrix = DMatrix::from_element(30, 60, 1.0);
        matrix[(15, 30)] = f64::INFINITY;
        let candidates = best_candidates(&matrix, usize::MAX);
        assert_eq!(candidates.len(), 30 * 60 - 1);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let matrix = DMatrix::from_element(30, 60, 1.0);
        let a = best_candidates(&matrix, 5);
        let b = best_candidates(&matrix, 5);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.elevation_deg, y.elevation_deg);
            assert_eq!(x.azimuth_deg, y.azimuth_deg);
        }
        // lowest cell index wins on equal cost
        assert_eq!(a[0].elevation_deg, -87.0);
        assert_eq!(a[0].azimuth_deg, -177.0);
    }

    #[test]
    fn test_smoothing_keeps_uniform_matrix_uniform() {
        // clamped elevation borders must not end up cheaper than the interior
        let mut matrix = DMatrix::from_element(30, 60, 2.5);
        smooth_cost_matrix(&mut matrix, HISTOGRAM_BIN_DEG, 30.0);
        let first = matrix[(0, 0)];
        assert!(first >= 2.5);
        for &v in matrix.iter() {
            assert!((v - first).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smoothing_never_reduces_a_cell() {
        let mut matrix = DMatrix::from_element(30, 60, 0.0);
        matrix[(10, 20)] = 3.0;
        let raw = matrix.clone();
        smooth_cost_matrix(&mut matrix, HISTOGRAM_BIN_DEG, 30.0);
        for (e, z) in itertools::iproduct!(0..30usize, 0..60usize) {
            assert!(matrix[(e, z)] >= raw[(e, z)]);
        }
    }

    #[test]
    fn test_smoothing_wraps_azimuth() {
        let mut matrix = DMatrix::from_element(30, 60, 0.0);
        matrix[(15, 0)] = 60.0;
        smooth_cost_matrix(&mut matrix, HISTOGRAM_BIN_DEG, 12.0);
        // the peak leaks across the azimuth seam
        assert!(matrix[(15, 59)] > 0.0);
        assert!(matrix[(15, 1)] > 0.0);
    }

    #[test]
    fn test_smoothing_spreads_infinite_cost() {
        let mut matrix = DMatrix::from_element(30, 60, 1.0);
        matrix[(15, 30)] = f64::INFINITY;
        smooth_cost_matrix(&mut matrix, HISTOGRAM_BIN_DEG, 12.0);
        // neighbors within the kernel radius become blocked too
        assert!(matrix[(15, 31)].is_infinite());
        assert!(matrix[(15, 28)].is_infinite());
        // cells far outside stay finite
        assert!(matrix[(15, 45)].is_finite());
    }

    #[test]
    fn test_blocked_direction_ranks_last() {
        let cloud = PointCloud::from_points(vec![
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.1, 2.0, 0.0),
        ]);
        let histogram = generate_histogram(&cloud, &Vector3::zeros());
        // goal straight behind the obstacle
        let matrix = build_cost_matrix(
            &histogram,
            &Vector3::new(0.0, 10.0, 0.0),
            &Vector3::zeros(),
            &Vector3::zeros(),
            &CostParameters::default(),
            30.0,
        );
        let best = best_candidates(&matrix, 1)[0];
        // the cheapest direction dodges the obstacle cone
        assert!(best.azimuth_deg.abs() > HISTOGRAM_BIN_DEG / 2.0 || best.elevation_deg.abs() > HISTOGRAM_BIN_DEG / 2.0);
    }
}
