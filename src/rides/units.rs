//! Unit systems and user-facing formatting of distances and speeds.

use clap::ValueEnum;

/// Meters to kilometers.
const M_TO_KM: f64 = 0.001;
/// Meters to miles.
const M_TO_MI: f64 = 0.000621371;
/// Meters per second to kilometers per hour.
const MPS_TO_KMH: f64 = 3.6;
/// Meters per second to miles per hour.
const MPS_TO_MPH: f64 = 2.2369363;

/// Unit system for displayed distances and speeds.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnitSystem {
    /// Kilometers and km/h.
    #[default]
    Metric,
    /// Miles and mph.
    Imperial,
}

impl UnitSystem {
    /// Converts a distance in meters into this system's distance unit.
    pub fn distance(&self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters * M_TO_KM,
            UnitSystem::Imperial => meters * M_TO_MI,
        }
    }

    /// Converts a speed in meters per second into this system's speed unit.
    pub fn speed(&self, mps: f64) -> f64 {
        match self {
            UnitSystem::Metric => mps * MPS_TO_KMH,
            UnitSystem::Imperial => mps * MPS_TO_MPH,
        }
    }

    /// Returns the distance unit symbol.
    pub fn distance_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    /// Returns the speed unit symbol.
    pub fn speed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    /// Formats a distance given in meters, with one decimal below 10 units
    /// and none above.
    pub fn format_distance(&self, meters: f64) -> String {
        let v = self.distance(meters);
        if v >= 10.0 {
            format!("{v:.0} {}", self.distance_unit())
        } else {
            format!("{v:.1} {}", self.distance_unit())
        }
    }

    /// Formats a speed given in meters per second, with one decimal below 10
    /// units and none above.
    pub fn format_speed(&self, mps: f64) -> String {
        let v = self.speed(mps);
        if v >= 10.0 {
            format!("{v:.0} {}", self.speed_unit())
        } else {
            format!("{v:.1} {}", self.speed_unit())
        }
    }
}
