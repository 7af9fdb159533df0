use std::f64::consts::{PI, TAU};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Wrap an azimuth into `[0, 360)`.
pub fn normalize_azimuth(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Interpolate between two azimuths the short way around the compass.
///
/// `350 -> 10` passes through north, never through 180.
pub fn interpolate_azimuth(start_deg: f64, end_deg: f64, t: f64) -> f64 {
    let start = start_deg.to_radians();
    let end = end_deg.to_radians();
    let diff = shortest_delta_rad(start, end);
    normalize_azimuth((start + t * diff).to_degrees())
}

/// Signed difference `to - from` reduced into `(-PI, PI]`.
fn shortest_delta_rad(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// Smallest absolute angle between two azimuths, in degrees.
pub fn azimuth_distance(a_deg: f64, b_deg: f64) -> f64 {
    shortest_delta_rad(a_deg.to_radians(), b_deg.to_radians())
        .to_degrees()
        .abs()
}

/// 16-point compass label for an azimuth, as reported by pass predictions.
pub fn compass_point(azimuth_deg: f64) -> &'static str {
    let sector = (normalize_azimuth(azimuth_deg) / 22.5).round() as usize % 16;
    COMPASS_POINTS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_normalize_negative_and_large() {
        assert!((normalize_azimuth(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_azimuth(725.0) - 5.0).abs() < EPS);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert_eq!(normalize_azimuth(-1e-20), 0.0);
    }

    #[test]
    fn test_interpolate_through_north() {
        let mid = interpolate_azimuth(350.0, 10.0, 0.5);
        assert!(azimuth_distance(mid, 0.0) < 1e-6, "mid = {}", mid);

        let mid = interpolate_azimuth(10.0, 350.0, 0.5);
        assert!(azimuth_distance(mid, 0.0) < 1e-6, "mid = {}", mid);
    }

    #[test]
    fn test_interpolate_unnormalized_inputs() {
        let quarter = interpolate_azimuth(-30.0, 390.0, 0.25);
        assert!(azimuth_distance(quarter, 345.0) < 1e-6, "quarter = {}", quarter);
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(202.5), "SSW");
        assert_eq!(compass_point(-45.0), "NW");
    }

    proptest! {
        #[test]
        fn prop_normalize_in_range_and_idempotent(x in -1.0e9f64..1.0e9) {
            let once = normalize_azimuth(x);
            prop_assert!((0.0..360.0).contains(&once), "{} -> {}", x, once);
            prop_assert_eq!(normalize_azimuth(once), once);
        }

        #[test]
        fn prop_interpolate_hits_endpoints(a in 0.0f64..360.0, b in 0.0f64..360.0) {
            let at_start = interpolate_azimuth(a, b, 0.0);
            let at_end = interpolate_azimuth(a, b, 1.0);
            prop_assert!(azimuth_distance(at_start, a) < 1e-9, "{} vs {}", at_start, a);
            prop_assert!(azimuth_distance(at_end, b) < 1e-9, "{} vs {}", at_end, b);
        }

        #[test]
        fn prop_interpolate_takes_short_arc(a in 0.0f64..360.0, b in 0.0f64..360.0, t in 0.0f64..=1.0) {
            let step = interpolate_azimuth(a, b, t);
            let total = azimuth_distance(a, b);
            prop_assert!(total <= 180.0 + EPS);
            prop_assert!(azimuth_distance(a, step) <= total + 1e-6);
        }
    }
}
