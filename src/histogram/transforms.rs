//! Angle and coordinate transforms for the polar histogram frame
//!
//! The histogram frame measures azimuth clockwise from the world y-axis
//! and elevation up from the horizontal plane, both in degrees. All
//! mappings are anchored at an arbitrary origin so they can be reused at
//! every tree node.

use nalgebra::Vector3;

use crate::common::PolarPoint;

/// Wrap an angle in degrees into (-180, 180].
pub fn wrap_angle_to_plus_minus_180(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    }
    if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Signed wrapped difference `a - b` in degrees, in (-180, 180].
pub fn angle_difference_deg(a_deg: f64, b_deg: f64) -> f64 {
    wrap_angle_to_plus_minus_180(a_deg - b_deg)
}

/// Remap a yaw angle from the FCU body convention into the histogram
/// angular frame.
pub fn fcu_yaw_to_histogram_frame_deg(yaw_fcu_deg: f64) -> f64 {
    wrap_angle_to_plus_minus_180(-yaw_fcu_deg + 90.0)
}

/// Polar coordinates of `p` as seen from `origin`.
pub fn cartesian_to_polar_histogram(p: &Vector3<f64>, origin: &Vector3<f64>) -> PolarPoint {
    let d = p - origin;
    let horizontal = (d.x * d.x + d.y * d.y).sqrt();
    PolarPoint {
        e: d.z.atan2(horizontal).to_degrees(),
        z: d.x.atan2(d.y).to_degrees(),
        r: d.norm(),
    }
}

/// World-frame position of a polar point anchored at `origin`.
pub fn polar_histogram_to_cartesian(p_pol: &PolarPoint, origin: &Vector3<f64>) -> Vector3<f64> {
    let e = p_pol.e.to_radians();
    let z = p_pol.z.to_radians();
    Vector3::new(
        origin.x + p_pol.r * e.cos() * z.sin(),
        origin.y + p_pol.r * e.cos() * z.cos(),
        origin.z + p_pol.r * e.sin(),
    )
}

/// Histogram cell `(elevation index, azimuth index)` of a polar direction.
///
/// Azimuth wraps around, elevation is clamped to the poles.
pub fn polar_to_histogram_index(p_pol: &PolarPoint, bin_deg: f64) -> (usize, usize) {
    let n_elevation = (180.0 / bin_deg) as usize;
    let n_azimuth = (360.0 / bin_deg) as usize;

    let mut z = wrap_angle_to_plus_minus_180(p_pol.z);
    if z >= 180.0 {
        z = -180.0;
    }
    let z_idx = (((z + 180.0) / bin_deg) as usize).min(n_azimuth - 1);

    let e = p_pol.e.max(-90.0).min(90.0);
    let e_idx = (((e + 90.0) / bin_deg) as usize).min(n_elevation - 1);

    (e_idx, z_idx)
}

/// Polar direction at the center of histogram cell `(e_idx, z_idx)`, with
/// the given radius.
pub fn histogram_index_to_polar(e_idx: usize, z_idx: usize, bin_deg: f64, radius: f64) -> PolarPoint {
    PolarPoint {
        e: -90.0 + bin_deg * (e_idx as f64 + 0.5),
        z: -180.0 + bin_deg * (z_idx as f64 + 0.5),
        r: radius,
    }
}
