//! Local flat-Earth projection of geographic coordinates.

use super::point::{LatLon, Point};

/// Meters per degree of latitude.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Equirectangular projection anchored at a reference latitude, mapping
/// coordinates to a planar (x, y) frame in meters.
///
/// This is a local approximation, valid at route scale (tens of kilometers).
/// It trades geodesic exactness for plain Euclidean point-to-segment math,
/// which is all the simplifier needs at a ~10 m tolerance.
#[derive(Clone, Copy, Debug)]
pub struct FlatProjection {
    /// Meters per degree of longitude at the reference latitude.
    meters_per_degree_lon: f64,
}

impl FlatProjection {
    /// Creates a projection anchored at the given latitude, in degrees.
    pub fn new(reference_lat: f64) -> Self {
        Self {
            meters_per_degree_lon: METERS_PER_DEGREE_LAT * reference_lat.to_radians().cos(),
        }
    }

    /// Projects the given coordinate to the planar frame, in meters.
    pub fn project(&self, p: &LatLon) -> Point<f64> {
        Point {
            x: p.lon * self.meters_per_degree_lon,
            y: p.lat * METERS_PER_DEGREE_LAT,
        }
    }
}
