//! Deviation-angle straightness criterion.
//!
//! The window's reference bearing is the slope between its first two points,
//! with longitude/latitude treated as planar x/y. This is a small-window
//! approximation; windows span tens of samples, a few hundred meters at most.
//!
//! Angle 0 doubles as the boundary placeholder and as "exactly collinear".
//! Both are dropped before averaging, matching the behavior the tuned
//! thresholds were calibrated against. Do not disambiguate them here.

use crate::track::TrackPoint;

/// Computes the deviation-angle series of a window, one angle per sample.
///
/// The first two and last two samples carry angle 0 unconditionally; there is
/// not enough geometry at the window boundary to compute a deviation. Every
/// other sample k gets `|atan((m1 - m2) / (1 + m1 * m2))|` in degrees, where
/// `m1` is the slope between samples 0 and 1 and `m2` the slope between
/// sample 0 and sample k. A vertical line or a perpendicular bearing would
/// divide by zero; those samples get angle 0 instead.
pub fn deviation_angles(window: &[TrackPoint]) -> Vec<f64> {
    if window.len() < 2 {
        return vec![0.0; window.len()];
    }

    let (x1, y1) = (window[0].longitude, window[0].latitude);
    let (x2, y2) = (window[1].longitude, window[1].latitude);
    let m1 = if x2 - x1 == 0.0 { 0.0 } else { (y2 - y1) / (x2 - x1) };

    let mut angles = Vec::with_capacity(window.len());
    for (k, point) in window.iter().enumerate() {
        if k < 2 || k >= window.len() - 2 {
            angles.push(0.0);
            continue;
        }
        let dx = x1 - point.longitude;
        if dx == 0.0 {
            angles.push(0.0);
            continue;
        }
        let m2 = (y1 - point.latitude) / dx;
        let denominator = 1.0 + m1 * m2;
        if denominator == 0.0 {
            angles.push(0.0);
            continue;
        }
        angles.push(((m1 - m2) / denominator).atan().to_degrees().abs());
    }
    angles
}

/// Mean of the non-zero entries of an angle series, 0 if none remain.
pub fn mean_nonzero_angle(angles: &[f64]) -> f64 {
    let nonzero: Vec<f64> = angles.iter().copied().filter(|&a| a != 0.0).collect();
    if nonzero.is_empty() {
        0.0
    } else {
        nonzero.iter().sum::<f64>() / nonzero.len() as f64
    }
}

/// Straightness verdict of a window based on its mean deviation angle.
pub fn is_straight_by_angle(angles: &[f64], angle_threshold: f64) -> bool {
    mean_nonzero_angle(angles).abs() < angle_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn window(coords: &[(f64, f64)]) -> Vec<TrackPoint> {
        coords
            .iter()
            .map(|&(lon, lat)| TrackPoint {
                timestamp: "2024-02-11 14:13:53".to_string(),
                altitude: 1000.0,
                horizontal_velocity: 10.0,
                vertical_velocity: -1.0,
                distance_to_takeoff: 1.0,
                longitude: lon,
                latitude: lat,
            })
            .collect()
    }

    fn collinear(n: usize) -> Vec<TrackPoint> {
        window(
            &(0..n)
                .map(|k| (7.0 + 0.001 * k as f64, 46.0 + 0.002 * k as f64))
                .collect::<Vec<_>>(),
        )
    }

    fn quarter_circle(n: usize) -> Vec<TrackPoint> {
        window(
            &(0..n)
                .map(|k| {
                    let theta = std::f64::consts::FRAC_PI_2 * k as f64 / (n - 1) as f64;
                    (7.0 + 0.01 * theta.cos(), 46.0 + 0.01 * theta.sin())
                })
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn boundary_samples_are_always_zero() {
        let angles = deviation_angles(&quarter_circle(10));
        assert_eq!(angles.len(), 10);
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[1], 0.0);
        assert_eq!(angles[8], 0.0);
        assert_eq!(angles[9], 0.0);
    }

    #[test]
    fn collinear_points_give_near_zero_angles() {
        let angles = deviation_angles(&collinear(10));
        for &angle in &angles[2..8] {
            assert!(angle.abs() < 1e-9, "angle {angle} not ~0");
        }
        assert!(is_straight_by_angle(&angles, 20.0));
    }

    #[test]
    fn quarter_circle_is_not_straight() {
        let angles = deviation_angles(&quarter_circle(10));
        assert!(!is_straight_by_angle(&angles, 20.0));
    }

    #[test]
    fn interior_angle_matches_the_tangent_identity() {
        let points = window(&[(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0), (4.0, 16.0)]);
        let angles = deviation_angles(&points);
        // k = 2: m1 = 1, m2 = 4/2 = 2, angle = |atan(-1/3)|
        let expected = (1.0f64 / 3.0).atan().to_degrees();
        assert!(is_close!(angles[2], expected));
    }

    #[test]
    fn vertical_reference_slope_falls_back_to_zero() {
        // First two points share a longitude, so m1 collapses to 0 and the
        // remaining angles are measured against a flat reference.
        let points = window(&[(1.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let angles = deviation_angles(&points);
        assert!(is_close!(angles[2], 63.43494882292201));
    }

    #[test]
    fn mean_drops_zero_entries() {
        assert_eq!(mean_nonzero_angle(&[0.0, 0.0, 10.0, 20.0, 0.0]), 15.0);
        assert_eq!(mean_nonzero_angle(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(mean_nonzero_angle(&[]), 0.0);
    }

    #[test]
    fn tiny_windows_are_all_boundary() {
        assert_eq!(deviation_angles(&window(&[(1.0, 1.0)])), vec![0.0]);
        assert_eq!(deviation_angles(&collinear(3)), vec![0.0, 0.0, 0.0]);
    }
}
