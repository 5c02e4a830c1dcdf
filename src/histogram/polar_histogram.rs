//! Discretized polar obstacle representation
//!
//! A cloud snapshot is collapsed into an elevation x azimuth grid of mean
//! obstacle distances, anchored at an arbitrary origin. The histogram is
//! regenerated at every tree node during expansion, so construction has to
//! stay a single pass over the cloud.

use nalgebra::{DMatrix, Vector3};

use crate::common::PointCloud;
use crate::histogram::transforms::{cartesian_to_polar_histogram, polar_to_histogram_index};

/// Angular bucket size shared across the histogram and the cost matrix [deg].
pub const HISTOGRAM_BIN_DEG: f64 = 6.0;

/// Distance value marking a cell with no obstacle.
pub const FREE_CELL_DIST: f64 = 0.0;

/// Elevation x azimuth grid of per-direction obstacle distances.
///
/// A cell holds the mean range of the cloud points falling into it, or
/// [`FREE_CELL_DIST`] when no point does.
#[derive(Debug, Clone)]
pub struct PolarHistogram {
    bin_deg: f64,
    dist: DMatrix<f64>,
}

impl PolarHistogram {
    pub fn new(bin_deg: f64) -> Self {
        let n_elevation = (180.0 / bin_deg) as usize;
        let n_azimuth = (360.0 / bin_deg) as usize;
        Self {
            bin_deg,
            dist: DMatrix::from_element(n_elevation, n_azimuth, FREE_CELL_DIST),
        }
    }

    pub fn bin_deg(&self) -> f64 {
        self.bin_deg
    }

    pub fn n_elevation(&self) -> usize {
        self.dist.nrows()
    }

    pub fn n_azimuth(&self) -> usize {
        self.dist.ncols()
    }

    pub fn get_dist(&self, e_idx: usize, z_idx: usize) -> f64 {
        self.dist[(e_idx, z_idx)]
    }

    pub fn set_dist(&mut self, e_idx: usize, z_idx: usize, dist: f64) {
        self.dist[(e_idx, z_idx)] = dist;
    }

    /// True when no cell holds an obstacle.
    pub fn is_empty(&self) -> bool {
        self.dist.iter().all(|&d| d == FREE_CELL_DIST)
    }

    pub fn set_zero(&mut self) {
        self.dist.fill(FREE_CELL_DIST);
    }
}

/// Build the obstacle histogram of `cloud` as seen from `origin`.
///
/// Each point is binned by its polar direction relative to the origin;
/// cells average the ranges of their points. Points coincident with the
/// origin carry no direction and are skipped.
pub fn generate_histogram(cloud: &PointCloud, origin: &Vector3<f64>) -> PolarHistogram {
    let mut histogram = PolarHistogram::new(HISTOGRAM_BIN_DEG);
    let mut counts = DMatrix::from_element(histogram.n_elevation(), histogram.n_azimuth(), 0u32);
    let mut sums = DMatrix::from_element(histogram.n_elevation(), histogram.n_azimuth(), 0.0f64);

    for point in cloud.iter() {
        let polar = cartesian_to_polar_histogram(point, origin);
        if polar.r <= f64::EPSILON {
            continue;
        }
        let (e_idx, z_idx) = polar_to_histogram_index(&polar, HISTOGRAM_BIN_DEG);
        counts[(e_idx, z_idx)] += 1;
        sums[(e_idx, z_idx)] += polar.r;
    }

    for e_idx in 0..histogram.n_elevation() {
        for z_idx in 0..histogram.n_azimuth() {
            if counts[(e_idx, z_idx)] > 0 {
                histogram.set_dist(e_idx, z_idx, sums[(e_idx, z_idx)] / counts[(e_idx, z_idx)] as f64);
            }
        }
    }

    histogram
}
