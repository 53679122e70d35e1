//! Loopride - generate round-trip cycling routes!

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod caching;
mod cli;
mod config;
mod geometry;
mod rides;
mod routing;

use anyhow::{bail, Context};
use caching::routes::RouteCache;
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, GenerateParams, RidesAction, StatsParams, WaypointParams};
use config::OrsConfig;
use geometry::point::{polyline_length, LatLon};
use geometry::simplify::{simplify, SimplifyParams};
use log::{error, warn};
use rand::Rng;
use rides::stats::RideStats;
use rides::store::RideStore;
use rides::units::UnitSystem;
use rides::Ride;
use routing::ors::OrsClient;
use routing::{Direction, RouteSpec};
use std::fs::File;
use std::io::BufWriter;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Cli {
        command,
        ors_config,
        rides_file,
        cache_directory,
        tolerance_meters,
        max_points,
        units,
    } = Cli::parse();

    let simplify_params = SimplifyParams {
        tolerance_meters,
        max_points: max_points as usize,
    };

    match command {
        Command::Generate(params) => {
            let config = require_ors_config(ors_config)?;
            let rt = Runtime::new().context("Failed to create the Tokio runtime")?;
            rt.block_on(generate(
                &config,
                &params,
                &simplify_params,
                cache_directory.as_deref(),
                &rides_file,
                units,
            ))
        }
        Command::Waypoints(params) => {
            let config = require_ors_config(ors_config)?;
            let rt = Runtime::new().context("Failed to create the Tokio runtime")?;
            rt.block_on(route_waypoints(
                &config,
                &params,
                &simplify_params,
                &rides_file,
                units,
            ))
        }
        Command::Rides(params) => run_rides(&rides_file, params.action, units),
        Command::Stats(params) => run_stats(&rides_file, &params, units),
    }
}

/// Checks that an OpenRouteService configuration was given on the command
/// line.
fn require_ors_config(ors_config: Option<OrsConfig>) -> anyhow::Result<OrsConfig> {
    match ors_config {
        Some(config) => Ok(config),
        None => bail!("This command queries the directions API; pass --ors-config"),
    }
}

/// Opens the route cache, falling back to a memory-only cache when the
/// on-disk layer can't be set up.
fn open_cache(cache_directory: Option<&str>) -> RouteCache {
    match cache_directory {
        Some(dir) => match RouteCache::new(Some(dir)) {
            Ok(cache) => cache,
            Err(e) => {
                error!("Couldn't create cache: {e:?}");
                RouteCache::in_memory()
            }
        },
        None => {
            warn!("No cache configured. You can set one up with --cache-directory.");
            RouteCache::in_memory()
        }
    }
}

/// Generates a round-trip loop, printing its summary and optionally saving
/// it.
async fn generate(
    config: &OrsConfig,
    params: &GenerateParams,
    simplify_params: &SimplifyParams,
    cache_directory: Option<&str>,
    rides_file: &str,
    units: UnitSystem,
) -> anyhow::Result<()> {
    let mut rng = rand::rng();
    let spec = RouteSpec {
        start: params.start,
        length_meters: params.length_km * 1_000,
        profile: params.profile,
        seed: params.seed.unwrap_or_else(|| rng.random()),
        direction: params.direction.resolve(&mut rng),
    };

    let mut cache = open_cache(cache_directory);
    let points = match cache.get(&spec) {
        Some(points) => points,
        None => {
            let client = reqwest::Client::new();
            let route = OrsClient::new(&client, config).round_trip(&spec).await?;
            let points = simplify(&route.points, simplify_params);
            if let Err(e) = cache.put(&spec, &points) {
                warn!("Couldn't cache the route: {e:?}");
            }
            points
        }
    };

    let distance_meters = polyline_length(&points).round() as u32;
    println!("Generated a {} loop (seed {}):", spec.profile, spec.seed);
    print_route_summary(&points, distance_meters, units);

    if let Some(path) = &params.output {
        write_geojson(path, &points)?;
        println!("Route written to: {path}");
    }
    if params.save {
        let id = save_ride(
            rides_file,
            &spec,
            String::new(),
            distance_meters,
            rides::estimate_duration_seconds(distance_meters),
            &points,
        )?;
        println!("Saved as ride {id}");
    }
    Ok(())
}

/// Generates a route through the given waypoints, printing its summary and
/// optionally saving it.
async fn route_waypoints(
    config: &OrsConfig,
    params: &WaypointParams,
    simplify_params: &SimplifyParams,
    rides_file: &str,
    units: UnitSystem,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let route = OrsClient::new(&client, config)
        .directions(params.profile, &params.points)
        .await?;
    let points = simplify(&route.points, simplify_params);

    let distance_meters = polyline_length(&points).round() as u32;
    println!(
        "Generated a {} route through {} waypoints:",
        params.profile,
        params.points.len()
    );
    print_route_summary(&points, distance_meters, units);

    if let Some(path) = &params.output {
        write_geojson(path, &points)?;
        println!("Route written to: {path}");
    }
    if params.save {
        let spec = RouteSpec {
            start: params.points[0],
            length_meters: distance_meters,
            profile: params.profile,
            seed: 0,
            direction: Direction::Clockwise,
        };
        let name = params.name.clone().unwrap_or_default();
        // Waypoint routes can be arbitrarily short; keep a 5-minute floor on
        // the estimate.
        let duration_seconds = rides::estimate_duration_seconds(distance_meters).max(300);
        let id = save_ride(rides_file, &spec, name, distance_meters, duration_seconds, &points)?;
        println!("Saved as ride {id}");
    }
    Ok(())
}

/// Prints the points, distance, estimated time and difficulty of a route.
fn print_route_summary(points: &[LatLon], distance_meters: u32, units: UnitSystem) {
    println!("  Points:     {}", points.len());
    println!(
        "  Distance:   {}",
        units.format_distance(distance_meters as f64)
    );
    println!(
        "  Est. time:  {}",
        rides::format_duration(rides::estimate_duration_seconds(distance_meters))
    );
    println!(
        "  Difficulty: {}/5",
        rides::difficulty_for_distance(distance_meters)
    );
}

/// Writes a route as a GeoJSON feature to the given path.
fn write_geojson(path: &str, points: &[LatLon]) -> anyhow::Result<()> {
    let coordinates: Vec<Vec<f64>> = points.iter().map(|p| vec![p.lon, p.lat]).collect();
    let feature = geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::LineString(
            coordinates,
        ))),
        id: None,
        properties: None,
        foreign_members: None,
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON output file: {path}"))?;
    serde_json::to_writer(BufWriter::new(file), &feature)
        .with_context(|| format!("Failed to write GeoJSON output file: {path}"))
}

/// Saves a generated route as a ride, returning its identifier.
fn save_ride(
    rides_file: &str,
    spec: &RouteSpec,
    name: String,
    distance_meters: u32,
    duration_seconds: u64,
    points: &[LatLon],
) -> anyhow::Result<u64> {
    let mut store = RideStore::open(rides_file)?;
    store.insert(Ride {
        id: 0,
        name,
        start: spec.start,
        spec_length_meters: spec.length_meters,
        spec_profile: spec.profile,
        spec_seed: spec.seed,
        spec_direction: spec.direction,
        distance_meters,
        duration_seconds,
        avg_speed_kmh: None,
        difficulty: Some(rides::difficulty_for_distance(distance_meters)),
        description: None,
        rating: None,
        created_at: Utc::now(),
        polyline: Some(points.to_vec()),
    })
}

/// Runs an action on the saved rides.
fn run_rides(rides_file: &str, action: RidesAction, units: UnitSystem) -> anyhow::Result<()> {
    let mut store = RideStore::open(rides_file)?;
    match action {
        RidesAction::List => {
            for ride in store.all() {
                println!(
                    "{:>4}  {}  {:>8}  {}",
                    ride.id,
                    ride.created_at.format("%Y-%m-%d"),
                    units.format_distance(ride.distance_meters as f64),
                    ride.name,
                );
            }
            Ok(())
        }
        RidesAction::Show { id } => match store.get(id) {
            Some(ride) => {
                println!("Ride {}: {}", ride.id, ride.name);
                println!("  Created:    {}", ride.created_at.format("%Y-%m-%d %H:%M"));
                println!(
                    "  Start:      {:.5},{:.5}",
                    ride.start.lat, ride.start.lon
                );
                println!("  Profile:    {}", ride.spec_profile);
                println!(
                    "  Distance:   {}",
                    units.format_distance(ride.distance_meters as f64)
                );
                println!(
                    "  Duration:   {}",
                    rides::format_duration(ride.duration_seconds)
                );
                if let Some(kmh) = ride.avg_speed_kmh {
                    println!("  Avg speed:  {}", units.format_speed(kmh / 3.6));
                }
                if let Some(difficulty) = ride.difficulty {
                    println!("  Difficulty: {difficulty}/5");
                }
                if let Some(rating) = ride.rating {
                    println!("  Rating:     {rating}/5");
                }
                if let Some(description) = &ride.description {
                    println!("  {description}");
                }
                Ok(())
            }
            None => bail!("No ride with id {id}"),
        },
        RidesAction::Rename { id, name } => {
            if !store.rename(id, &name)? {
                bail!("No ride with id {id}");
            }
            Ok(())
        }
        RidesAction::Describe {
            id,
            description,
            rating,
        } => {
            if !store.update_details(id, description, rating)? {
                bail!("No ride with id {id}");
            }
            Ok(())
        }
        RidesAction::Log {
            id,
            distance_km,
            duration_min,
        } => {
            let distance_meters = (distance_km * 1_000.0).round() as u32;
            let duration_seconds = duration_min * 60;
            let avg_speed_kmh = if duration_seconds > 0 {
                Some(distance_km / (duration_seconds as f64 / 3600.0))
            } else {
                None
            };
            let difficulty = rides::difficulty_for_distance(distance_meters);
            if !store.update_tracking(
                id,
                distance_meters,
                duration_seconds,
                avg_speed_kmh,
                difficulty,
            )? {
                bail!("No ride with id {id}");
            }
            Ok(())
        }
        RidesAction::Delete { id } => {
            if !store.delete(id)? {
                bail!("No ride with id {id}");
            }
            Ok(())
        }
    }
}

/// Prints aggregated statistics over the saved rides.
fn run_stats(rides_file: &str, params: &StatsParams, units: UnitSystem) -> anyhow::Result<()> {
    let store = RideStore::open(rides_file)?;
    let now = Utc::now();
    let rides = match params.range.window_start(now) {
        Some(start) => store.between(start, now),
        None => store.all_by_creation(),
    };
    let stats = RideStats::aggregate(rides);

    println!(
        "Total Distance:   {}",
        units.format_distance(stats.total_distance_meters as f64)
    );
    println!(
        "Total Ride Time:  {}",
        rides::format_hours(stats.total_duration_seconds)
    );
    println!(
        "Average Speed:    {}",
        units.format_speed(stats.avg_speed_kmh() / 3.6)
    );
    println!(
        "Most Active Days: {}",
        if stats.most_active_days.is_empty() {
            "-".to_owned()
        } else {
            stats.most_active_days.join(", ")
        }
    );
    println!("Total Rides:      {} rides", stats.ride_count);
    if let Some((name, distance)) = &stats.longest {
        println!(
            "Longest Ride:     {} ({})",
            name,
            units.format_distance(*distance as f64)
        );
    }

    if !stats.daily.is_empty() {
        println!();
        for bucket in &stats.daily {
            println!(
                "  {:>6}  {:>8}  {:>2} ride(s)",
                bucket.label(),
                units.format_distance(bucket.distance_meters as f64),
                bucket.rides,
            );
        }
    }
    Ok(())
}
