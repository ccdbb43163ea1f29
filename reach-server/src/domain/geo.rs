//! Coordinates and the search origin.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Largest search radius the provider accepts, in metres.
pub const MAX_RADIUS_M: u32 = 4000;

/// A WGS84 point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance in metres.
    pub fn distance_m(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Error returned when an origin cannot be searched from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidOrigin {
    #[error("latitude {0} outside -90..=90")]
    Latitude(f64),

    #[error("longitude {0} outside -180..=180")]
    Longitude(f64),

    #[error("radius {radius} m exceeds the {max} m limit")]
    Radius { radius: u32, max: u32 },
}

/// The point a reachability search starts from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub location: Coordinate,
    pub radius_m: u32,
}

impl Origin {
    /// Create a validated origin using the provider's radius limit.
    pub fn new(latitude: f64, longitude: f64, radius_m: u32) -> Result<Self, InvalidOrigin> {
        Self::with_max_radius(latitude, longitude, radius_m, MAX_RADIUS_M)
    }

    /// Create a validated origin with a custom radius limit.
    pub fn with_max_radius(
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        max_radius_m: u32,
    ) -> Result<Self, InvalidOrigin> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidOrigin::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidOrigin::Longitude(longitude));
        }
        if radius_m > max_radius_m {
            return Err(InvalidOrigin::Radius {
                radius: radius_m,
                max: max_radius_m,
            });
        }

        Ok(Self {
            location: Coordinate::new(latitude, longitude),
            radius_m,
        })
    }

    /// Whether a point lies inside the search circle.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.location.distance_m(point) <= self.radius_m as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_zero_for_same_point() {
        let p = Coordinate::new(35.6439, 139.6993);
        assert!(p.distance_m(&p) < 1e-6);
    }

    #[test]
    fn distance_shibuya_to_tokyo() {
        // Shibuya to Tokyo station is roughly 6.5 km
        let shibuya = Coordinate::new(35.6580, 139.7016);
        let tokyo = Coordinate::new(35.6812, 139.7671);
        let d = shibuya.distance_m(&tokyo);
        assert!((6000.0..7000.0).contains(&d), "got {d}");
    }

    #[test]
    fn valid_origin() {
        let origin = Origin::new(35.6439, 139.6993, 100).unwrap();
        assert_eq!(origin.radius_m, 100);
        assert_eq!(origin.location.latitude, 35.6439);
    }

    #[test]
    fn invalid_origins() {
        assert_eq!(
            Origin::new(91.0, 0.0, 100),
            Err(InvalidOrigin::Latitude(91.0))
        );
        assert_eq!(
            Origin::new(0.0, -180.5, 100),
            Err(InvalidOrigin::Longitude(-180.5))
        );
        assert!(matches!(
            Origin::new(f64::NAN, 0.0, 100),
            Err(InvalidOrigin::Latitude(_))
        ));
        assert_eq!(
            Origin::new(0.0, 0.0, 4001),
            Err(InvalidOrigin::Radius {
                radius: 4001,
                max: 4000
            })
        );
        assert!(Origin::new(0.0, 0.0, 4000).is_ok());
    }

    #[test]
    fn contains_within_radius() {
        let origin = Origin::new(35.6439, 139.6993, 100).unwrap();
        // ~55 m north
        assert!(origin.contains(&Coordinate::new(35.6444, 139.6993)));
        // ~550 m north
        assert!(!origin.contains(&Coordinate::new(35.6489, 139.6993)));
    }
}
