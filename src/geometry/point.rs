//! Geographic and planar points, with the distance helpers used across the
//! route commands.

use serde::{Deserialize, Serialize};

/// Mean Earth radius, in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Data structure representing a planar point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

/// Data structure representing a latitude-longitude coordinate.
///
/// Serialized as a `{lat, lon}` object, which is also the persisted form of
/// route geometry in the ride store.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude, in degrees.
    pub lat: f64,
    /// Longitude, in degrees.
    pub lon: f64,
}

impl LatLon {
    /// Returns the great-circle distance to the other coordinate, in meters.
    pub fn haversine_distance(&self, other: &LatLon) -> f64 {
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let sin_dlat = (dlat / 2.0).sin();
        let sin_dlon = (dlon / 2.0).sin();
        let c = 2.0
            * (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon)
                .sqrt()
                .asin();

        EARTH_RADIUS_METERS * c
    }
}

/// Returns the length of the path connecting the given points, in meters.
///
/// A polyline of fewer than 2 points has length zero.
pub fn polyline_length(points: &[LatLon]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].haversine_distance(&pair[1]))
        .sum()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn haversine_one_millidegree_of_latitude() {
        let a = LatLon { lat: 0.0, lon: 0.0 };
        let b = LatLon { lat: 0.001, lon: 0.0 };
        let d = a.haversine_distance(&b);
        // One millidegree of latitude is about 111.2 meters.
        assert!((d - 111.2).abs() < 1.0, "distance = {d}");
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = LatLon { lat: 47.37, lon: 8.54 };
        let b = LatLon { lat: 47.38, lon: 8.56 };
        assert_eq!(a.haversine_distance(&b), b.haversine_distance(&a));
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        let a = LatLon { lat: 47.37, lon: 8.54 };
        assert_eq!(a.haversine_distance(&a), 0.0);
    }

    #[test]
    fn polyline_length_degenerate() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[LatLon { lat: 1.0, lon: 2.0 }]), 0.0);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let points = [
            LatLon { lat: 0.0, lon: 0.0 },
            LatLon { lat: 0.001, lon: 0.0 },
            LatLon { lat: 0.002, lon: 0.0 },
        ];
        let total = polyline_length(&points);
        let first = points[0].haversine_distance(&points[1]);
        let second = points[1].haversine_distance(&points[2]);
        assert!((total - (first + second)).abs() < 1e-9);
    }
}
