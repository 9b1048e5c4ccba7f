// src/models/coordinate.rs
// DOCUMENTATION: Geographic coordinate shared by the client and the proxy
// PURPOSE: Latitude/longitude pair with range checks and distance math

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees
/// DOCUMENTATION: Produced by geolocation (or a configured fallback), consumed by
/// map initialization and the nearby services request.
/// Range is not enforced on construction; callers that need it use `is_valid`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// True when latitude is within -90..=90 and longitude within -180..=180
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Position in map order: [longitude, latitude]
    pub fn map_position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance to another coordinate in meters
    /// Uses Haversine formula
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ranges() {
        assert!(Coordinate::new(40.4168, -3.7038).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_map_position_is_lon_lat() {
        let c = Coordinate::new(20.0, 10.0);
        assert_eq!(c.map_position(), [10.0, 20.0]);
    }

    #[test]
    fn test_distance() {
        let madrid = Coordinate::new(40.4168, -3.7038);
        let same = Coordinate::new(40.4168, -3.7038);
        assert_eq!(madrid.distance_to(&same), 0.0);

        // One degree of latitude is roughly 111 km
        let north = Coordinate::new(41.4168, -3.7038);
        let d = madrid.distance_to(&north);
        assert!(d > 110_000.0 && d < 112_500.0);
    }

    #[test]
    fn test_point_conversion() {
        let c = Coordinate::new(20.0, 10.0);
        let p: Point<f64> = c.into();
        assert_eq!(p.x(), 10.0);
        assert_eq!(p.y(), 20.0);
        assert_eq!(Coordinate::from(p), c);
    }
}
