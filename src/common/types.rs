//! Common types used throughout local_avoidance

use nalgebra::Vector3;

/// Direction-plus-range in the planner's polar histogram frame.
///
/// Angles are in degrees: `e` is the elevation above the horizontal plane
/// in [-90, 90], `z` is the azimuth measured clockwise from the y-axis in
/// (-180, 180]. `r` is the range in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub e: f64,
    pub z: f64,
    pub r: f64,
}

impl PolarPoint {
    pub fn new(e: f64, z: f64, r: f64) -> Self {
        Self { e, z, r }
    }
}

/// Obstacle point cloud snapshot in the world frame.
///
/// One snapshot is consumed per planning cycle; an empty cloud is legal
/// and yields an obstacle-free histogram.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub points: Vec<Vector3<f64>>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Vector3<f64>) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector3<f64>> {
        self.points.iter()
    }

    /// Points within `range` of `center`, as a new cloud. Useful for
    /// simulating a range-limited sensor snapshot.
    pub fn within_range(&self, center: &Vector3<f64>, range: f64) -> PointCloud {
        let points = self
            .points
            .iter()
            .filter(|p| (*p - center).norm() <= range)
            .cloned()
            .collect();
        PointCloud { points }
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Vector3<f64>>> for PointCloud {
    fn from(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointcloud_push_and_len() {
        let mut cloud = PointCloud::new();
        assert!(cloud.is_empty());
        cloud.push(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(cloud.len(), 1);
    }

    #[test]
    fn test_pointcloud_within_range() {
        let cloud = PointCloud::from_points(vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ]);
        let near = cloud.within_range(&Vector3::zeros(), 3.0);
        assert_eq!(near.len(), 2);
    }

    #[test]
    fn test_polar_point_new() {
        let p = PolarPoint::new(10.0, -45.0, 2.5);
        assert_eq!(p.e, 10.0);
        assert_eq!(p.z, -45.0);
        assert_eq!(p.r, 2.5);
    }
}
