//! Directions around the listener.
//!
//! Angles are degrees because every measurement set in the literature uses degrees.  The vertical-polar convention
//! is: azimuth 0 straight ahead and increasing clockwise as seen from above (90 is to the right), elevation -90
//! straight down and 90 straight up.  The matching Cartesian frame is x forward, y right, z up.
//!
//! A direction is immutable once built.  Both representations are carried; the one not supplied at construction is
//! derived then and never recomputed.
use crate::math::Vec3;

/// A measurement direction relative to the listening point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Direction {
    azimuth: f64,
    elevation: f64,
    distance: f64,
    cartesian: Vec3,
}

impl Direction {
    /// Build from vertical-polar coordinates: azimuth and elevation in degrees, distance in meters.
    ///
    /// # Panics
    ///
    /// Panics if `distance` is not strictly positive or the angles are not finite.
    pub fn from_polar(azimuth: f64, elevation: f64, distance: f64) -> Direction {
        assert!(
            azimuth.is_finite() && elevation.is_finite(),
            "angles must be finite"
        );
        assert!(distance > 0.0, "distance must be strictly positive");

        let azimuth = normalize_azimuth(azimuth);
        let (az, el) = (azimuth.to_radians(), elevation.to_radians());
        let cartesian = Vec3::new(
            el.cos() * az.cos() * distance,
            el.cos() * az.sin() * distance,
            el.sin() * distance,
        );

        Direction {
            azimuth,
            elevation,
            distance,
            cartesian,
        }
    }

    /// Build from Cartesian coordinates in meters.
    ///
    /// # Panics
    ///
    /// Panics on the zero vector or non-finite components; "no direction" is not a direction.
    pub fn from_cartesian(x: f64, y: f64, z: f64) -> Direction {
        let cartesian = Vec3::new(x, y, z);
        assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "coordinates must be finite"
        );
        let distance = cartesian.norm();
        assert!(distance > 0.0, "the zero vector has no direction");

        Direction {
            azimuth: normalize_azimuth(y.atan2(x).to_degrees()),
            elevation: (z / distance).asin().to_degrees(),
            distance,
            cartesian,
        }
    }

    /// Azimuth in degrees, in `(-180, 180]`.
    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Elevation in degrees, in `[-90, 90]`.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Distance from the listening point in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn cartesian(&self) -> Vec3 {
        self.cartesian
    }

    /// Projection onto the unit sphere; all the geometry works on this.
    pub fn unit_vector(&self) -> Vec3 {
        self.cartesian.normalized()
    }

    /// Angular offset from the median plane, in degrees, positive to the right.
    ///
    /// Directions sharing a lateral angle lie on one cone of confusion, which is what
    /// [crate::FilterBank::cone_sources] selects on.
    pub fn lateral_angle(&self) -> f64 {
        (self.cartesian.y / self.distance).clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Great-circle separation from another direction, in degrees.  Distance plays no part.
    pub fn angle_to(&self, other: &Direction) -> f64 {
        let cos = self.unit_vector().dot(other.unit_vector()).clamp(-1.0, 1.0);
        cos.acos().to_degrees()
    }
}

fn normalize_azimuth(azimuth: f64) -> f64 {
    let wrapped = azimuth.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
