//! JSON schemas for the [OpenRouteService directions
//! API](https://openrouteservice.org/dev/#/api-docs/v2/directions).

use crate::geometry::point::LatLon;
use anyhow::{bail, Context};
use geojson::{FeatureCollection, Value};
use serde::{Deserialize, Serialize};

/// Round-trip options of a directions request.
#[derive(Debug, Serialize)]
pub struct RoundTripOptions {
    /// Target length of the loop, in meters.
    pub length: u32,
    /// Number of via points used to shape the loop.
    pub points: u32,
    /// Seed shaping the loop.
    pub seed: u32,
}

/// Route options of a directions request.
#[derive(Debug, Serialize)]
pub struct DirectionsOptions {
    /// Round-trip options, when requesting a loop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_trip: Option<RoundTripOptions>,
}

/// Body of a directions request.
#[derive(Debug, Serialize)]
pub struct DirectionsBody {
    /// Waypoints as `[longitude, latitude]` pairs. A round-trip request has
    /// exactly one, the start.
    pub coordinates: Vec<[f64; 2]>,
    /// Route options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DirectionsOptions>,
    /// Whether to include turn-by-turn instructions.
    pub instructions: bool,
    /// Whether to include elevation data.
    pub elevation: bool,
    /// Whether the server should pre-simplify the geometry.
    pub geometry_simplify: bool,
}

impl DirectionsBody {
    /// Builds a request for a round-trip loop from a single start coordinate.
    pub fn round_trip(start: &LatLon, options: RoundTripOptions) -> Self {
        Self {
            coordinates: vec![[start.lon, start.lat]],
            options: Some(DirectionsOptions {
                round_trip: Some(options),
            }),
            instructions: false,
            elevation: false,
            geometry_simplify: true,
        }
    }

    /// Builds a request for a route visiting the given waypoints in order.
    pub fn waypoints(points: &[LatLon]) -> Self {
        Self {
            coordinates: points.iter().map(|p| [p.lon, p.lat]).collect(),
            options: None,
            instructions: false,
            elevation: false,
            geometry_simplify: true,
        }
    }
}

/// Summary properties of a directions response feature.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RouteSummary {
    /// Total route length, in meters.
    pub distance: f64,
    /// Estimated travel time, in seconds.
    pub duration: f64,
}

/// A route decoded from a directions response.
#[derive(Debug)]
pub struct DirectionsRoute {
    /// Route geometry, in visiting order.
    pub points: Vec<LatLon>,
    /// Route summary, when the server provided one.
    pub summary: Option<RouteSummary>,
}

/// Decodes a GeoJSON directions response into the first route it contains.
pub fn decode_response(body: &str) -> anyhow::Result<DirectionsRoute> {
    let collection: FeatureCollection = body
        .parse()
        .context("Failed to parse directions response as GeoJSON")?;

    let Some(feature) = collection.features.into_iter().next() else {
        bail!("Directions response contains no route");
    };

    let geometry = feature
        .geometry
        .context("Directions response feature has no geometry")?;
    let line = match geometry.value {
        Value::LineString(line) => line,
        _ => bail!("Expected a LineString route geometry"),
    };
    let points = line
        .iter()
        .map(|position| LatLon {
            lat: position[1],
            lon: position[0],
        })
        .collect();

    let summary = feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get("summary"))
        .and_then(|summary| serde_json::from_value(summary.clone()).ok());

    Ok(DirectionsRoute { points, summary })
}
