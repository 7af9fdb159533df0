//! Horizontal-coordinate projection onto the scene's globe.
//!
//! One convention is used for every point in the scene: `y` is up, azimuth is
//! measured clockwise from `+z` toward `+x`, and elevation is measured from
//! the `x`/`z` plane. Observer placement reuses it with longitude as the
//! azimuth and latitude as the elevation.

use serde::Serialize;
use utoipa::ToSchema;

use super::angles::normalize_azimuth;
use crate::pass::ObserverCoordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn normalized(&self) -> Option<Point3> {
        let n = self.norm();
        if n > 0.0 && n.is_finite() {
            Some(Point3::new(self.x / n, self.y / n, self.z / n))
        } else {
            None
        }
    }
}

/// Angles recovered from a Cartesian point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub radius: f64,
}

pub fn spherical_to_cartesian(azimuth_deg: f64, elevation_deg: f64, radius: f64) -> Point3 {
    let az = azimuth_deg.to_radians();
    let el = elevation_deg.to_radians();
    Point3 {
        x: radius * el.cos() * az.sin(),
        y: radius * el.sin(),
        z: radius * el.cos() * az.cos(),
    }
}

/// Inverse of [`spherical_to_cartesian`]. `None` for the origin or
/// non-finite input.
pub fn cartesian_to_spherical(point: Point3) -> Option<Spherical> {
    if !point.is_finite() {
        return None;
    }
    let radius = point.norm();
    if radius == 0.0 {
        return None;
    }
    let elevation = (point.y / radius).clamp(-1.0, 1.0).asin().to_degrees();
    let azimuth = normalize_azimuth(point.x.atan2(point.z).to_degrees());
    Some(Spherical {
        azimuth_deg: azimuth,
        elevation_deg: elevation,
        radius,
    })
}

/// Observer marker position just above the globe surface.
pub fn observer_position(coords: &ObserverCoordinates, radius: f64) -> Point3 {
    spherical_to_cartesian(coords.longitude, coords.latitude, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::azimuth_distance;
    use proptest::prelude::*;

    #[test]
    fn test_cardinal_directions() {
        let north = spherical_to_cartesian(0.0, 0.0, 1.0);
        assert!((north.z - 1.0).abs() < 1e-12 && north.x.abs() < 1e-12);

        let east = spherical_to_cartesian(90.0, 0.0, 1.0);
        assert!((east.x - 1.0).abs() < 1e-12 && east.z.abs() < 1e-12);

        let zenith = spherical_to_cartesian(123.0, 90.0, 2.0);
        assert!((zenith.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_origin_has_no_angles() {
        assert!(cartesian_to_spherical(Point3::new(0.0, 0.0, 0.0)).is_none());
        assert!(cartesian_to_spherical(Point3::new(f64::NAN, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_observer_uses_same_convention() {
        let coords = ObserverCoordinates::new(41.702, -76.014, 0.0).unwrap();
        let marker = observer_position(&coords, 1.01);
        let back = cartesian_to_spherical(marker).unwrap();
        assert!((back.elevation_deg - 41.702).abs() < 1e-9);
        assert!(azimuth_distance(back.azimuth_deg, -76.014) < 1e-9);
        assert!((back.radius - 1.01).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_round_trip(az in 0.0f64..360.0, el in 0.0f64..89.9, r in 0.5f64..3.0) {
            let p = spherical_to_cartesian(az, el, r);
            let s = cartesian_to_spherical(p).unwrap();
            prop_assert!(azimuth_distance(s.azimuth_deg, az) < 1e-6, "{} vs {}", s.azimuth_deg, az);
            prop_assert!((s.elevation_deg - el).abs() < 1e-6);
            prop_assert!((s.radius - r).abs() < 1e-9);
        }
    }
}
