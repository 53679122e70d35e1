//! Module to persist and analyze rides.

pub mod stats;
pub mod store;
pub mod units;

use crate::geometry::point::LatLon;
use crate::routing::{Direction, Profile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Average cycling speed used for time estimates, in km/h.
const ESTIMATE_SPEED_KMH: f64 = 15.0;

/// A saved ride record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ride {
    /// Unique identifier, assigned by the store.
    pub id: u64,
    /// Display name, defaulting to `Route {id}`.
    pub name: String,
    /// Start coordinate of the route.
    pub start: LatLon,
    /// Requested loop length, in meters.
    pub spec_length_meters: u32,
    /// Cycling profile the route was generated with.
    pub spec_profile: Profile,
    /// Seed the loop shape was generated from.
    pub spec_seed: u32,
    /// Direction of travel around the loop.
    pub spec_direction: Direction,
    /// Distance covered, in meters.
    pub distance_meters: u32,
    /// Moving time, in seconds.
    pub duration_seconds: u64,
    /// Average speed, in km/h, when known.
    pub avg_speed_kmh: Option<f64>,
    /// Difficulty on a 1-5 scale.
    pub difficulty: Option<u8>,
    /// Free-form description.
    pub description: Option<String>,
    /// Rating on a 1-5 scale.
    pub rating: Option<u8>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Simplified route geometry, when persisted.
    pub polyline: Option<Vec<LatLon>>,
}

/// Returns the difficulty of a ride on a 1-5 scale, based on its distance.
pub fn difficulty_for_distance(meters: u32) -> u8 {
    let km = meters as f64 / 1000.0;
    if km < 10.0 {
        1
    } else if km < 30.0 {
        2
    } else if km < 60.0 {
        3
    } else if km < 100.0 {
        4
    } else {
        5
    }
}

/// Returns the estimated riding time for the given distance, in seconds.
pub fn estimate_duration_seconds(meters: u32) -> u64 {
    let hours = meters as f64 / 1000.0 / ESTIMATE_SPEED_KMH;
    (hours * 3600.0).round() as u64
}

/// Formats a duration as `1h 02m 03s`, omitting the hours when zero.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else {
        format!("{m}m {s:02}s")
    }
}

/// Formats a duration as `2 h 5 min`, omitting the hours when zero.
pub fn format_hours(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = ((seconds % 3600) as f64 / 60.0).round() as u64;
    if h > 0 {
        format!("{h} h {m} min")
    } else {
        format!("{m} min")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn difficulty_thresholds() {
        assert_eq!(difficulty_for_distance(0), 1);
        assert_eq!(difficulty_for_distance(9_999), 1);
        assert_eq!(difficulty_for_distance(10_000), 2);
        assert_eq!(difficulty_for_distance(29_999), 2);
        assert_eq!(difficulty_for_distance(30_000), 3);
        assert_eq!(difficulty_for_distance(59_999), 3);
        assert_eq!(difficulty_for_distance(60_000), 4);
        assert_eq!(difficulty_for_distance(99_999), 4);
        assert_eq!(difficulty_for_distance(100_000), 5);
        assert_eq!(difficulty_for_distance(1_000_000), 5);
    }

    #[test]
    fn estimate_at_fifteen_kmh() {
        assert_eq!(estimate_duration_seconds(15_000), 3600);
        assert_eq!(estimate_duration_seconds(7_500), 1800);
        assert_eq!(estimate_duration_seconds(0), 0);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0m 00s");
        assert_eq!(format_duration(125), "2m 05s");
        assert_eq!(format_duration(3723), "1h 02m 03s");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(0), "0 min");
        assert_eq!(format_hours(1800), "30 min");
        assert_eq!(format_hours(9000), "2 h 30 min");
    }
}
