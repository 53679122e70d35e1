//! Command-line interface.

use crate::config::OrsConfig;
use crate::geometry::point::LatLon;
use crate::rides::stats::StatsRange;
use crate::rides::units::UnitSystem;
use crate::routing::{Direction, Profile};
use clap::{Parser, Subcommand};

/// Generate round-trip cycling routes.
#[derive(Parser, Debug)]
#[command(name = "Loopride")]
#[command(version)]
#[command(author)]
#[command(about = "Generate round-trip cycling routes", long_about = None)]
pub struct Cli {
    /// Sub-command to run.
    #[command(subcommand)]
    pub command: Command,

    /// JSON file containing the OpenRouteService configuration.
    #[arg(long = "ors-config", value_parser = clap::value_parser!(OrsConfig))]
    pub ors_config: Option<OrsConfig>,

    /// JSON file storing saved rides.
    #[arg(long, default_value = "rides.json")]
    pub rides_file: String,

    /// Path of the cache directory.
    #[arg(long, short = 'c')]
    pub cache_directory: Option<String>,

    /// Simplification tolerance, in meters.
    #[arg(long, default_value_t = 10.0)]
    pub tolerance_meters: f64,

    /// Maximum number of points to keep in a simplified route.
    #[arg(long, default_value_t = 400, value_parser = clap::value_parser!(u32).range(2..))]
    pub max_points: u32,

    /// Unit system for displayed distances and speeds.
    #[arg(long, value_enum, default_value = "metric")]
    pub units: UnitSystem,
}

/// Sub-commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a round-trip loop from a start coordinate.
    Generate(GenerateParams),

    /// Generate a route through a list of waypoints.
    Waypoints(WaypointParams),

    /// Manage saved rides.
    Rides(RidesParams),

    /// Show aggregated statistics over saved rides.
    Stats(StatsParams),
}

/// Parameters to generate a round-trip loop.
#[derive(Parser, Debug)]
pub struct GenerateParams {
    /// Start coordinate, as `lat,lon` decimal degrees.
    #[arg(long, value_parser = parse_lat_lon)]
    pub start: LatLon,

    /// Target loop length, in kilometers.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=150))]
    pub length_km: u32,

    /// Cycling profile to route with.
    #[arg(long, value_enum, default_value = "regular")]
    pub profile: Profile,

    /// Direction of travel around the loop.
    #[arg(long, value_enum, default_value = "random")]
    pub direction: Direction,

    /// Seed shaping the loop; random when omitted.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Save the generated route as a ride.
    #[arg(long)]
    pub save: bool,

    /// Write the simplified route to a GeoJSON file.
    #[arg(long)]
    pub output: Option<String>,
}

/// Parameters to generate a route through waypoints.
#[derive(Parser, Debug)]
pub struct WaypointParams {
    /// Waypoint(s) to visit in order, as `lat,lon` decimal degrees.
    #[arg(long = "point", short = 'p', required = true, value_parser = parse_lat_lon)]
    pub points: Vec<LatLon>,

    /// Name to save the ride under.
    #[arg(long)]
    pub name: Option<String>,

    /// Cycling profile to route with.
    #[arg(long, value_enum, default_value = "regular")]
    pub profile: Profile,

    /// Save the generated route as a ride.
    #[arg(long)]
    pub save: bool,

    /// Write the simplified route to a GeoJSON file.
    #[arg(long)]
    pub output: Option<String>,
}

/// Parameters to manage saved rides.
#[derive(Parser, Debug)]
pub struct RidesParams {
    /// Action to perform.
    #[command(subcommand)]
    pub action: RidesAction,
}

/// Actions on saved rides.
#[derive(Subcommand, Debug)]
pub enum RidesAction {
    /// List saved rides, newest first.
    List,

    /// Show the details of a ride.
    Show {
        /// Identifier of the ride.
        id: u64,
    },

    /// Rename a ride.
    Rename {
        /// Identifier of the ride.
        id: u64,
        /// New name.
        name: String,
    },

    /// Set the description and/or rating of a ride.
    Describe {
        /// Identifier of the ride.
        id: u64,
        /// Free-form description.
        #[arg(long)]
        description: Option<String>,
        /// Rating on a 1-5 scale.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },

    /// Record the distance and moving time actually ridden.
    Log {
        /// Identifier of the ride.
        id: u64,
        /// Distance covered, in kilometers.
        #[arg(long)]
        distance_km: f64,
        /// Moving time, in minutes.
        #[arg(long)]
        duration_min: u64,
    },

    /// Delete a ride.
    Delete {
        /// Identifier of the ride.
        id: u64,
    },
}

/// Parameters to show statistics.
#[derive(Parser, Debug)]
pub struct StatsParams {
    /// Time window to aggregate over.
    #[arg(long, value_enum, default_value = "all")]
    pub range: StatsRange,
}

/// Parses a `lat,lon` pair of decimal degrees.
fn parse_lat_lon(s: &str) -> Result<LatLon, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected `lat,lon`, got `{s}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("Invalid latitude `{lat}`: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("Invalid longitude `{lon}`: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Latitude out of range: {lat}"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Longitude out of range: {lon}"));
    }
    Ok(LatLon { lat, lon })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_coordinates() {
        assert_eq!(
            parse_lat_lon("47.37, 8.54").unwrap(),
            LatLon {
                lat: 47.37,
                lon: 8.54
            }
        );
        assert_eq!(
            parse_lat_lon("-33.9,151.2").unwrap(),
            LatLon {
                lat: -33.9,
                lon: 151.2
            }
        );
    }

    #[test]
    fn reject_malformed_coordinates() {
        assert!(parse_lat_lon("47.37").is_err());
        assert!(parse_lat_lon("47.37;8.54").is_err());
        assert!(parse_lat_lon("north,east").is_err());
        assert!(parse_lat_lon("91.0,8.54").is_err());
        assert!(parse_lat_lon("47.37,181.0").is_err());
    }
}
