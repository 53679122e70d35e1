//! Client for the [OpenRouteService](https://openrouteservice.org/)
//! directions API.

use super::schema::{decode_response, DirectionsBody, DirectionsRoute, RoundTripOptions};
use super::{Direction, Profile, RouteSpec};
use crate::config::OrsConfig;
use crate::geometry::point::LatLon;
use anyhow::{bail, Context};
use log::{debug, info};
use reqwest::Client;

/// Smallest round-trip length accepted by the API, in meters.
const MIN_ROUND_TRIP_METERS: u32 = 1_000;
/// Largest round-trip length accepted by the API, in meters.
const MAX_ROUND_TRIP_METERS: u32 = 150_000;
/// Number of via points used to shape a round trip.
const ROUND_TRIP_POINTS: u32 = 5;

/// Client to query routes from the directions API.
pub struct OrsClient<'a> {
    client: &'a Client,
    config: &'a OrsConfig,
}

impl<'a> OrsClient<'a> {
    /// Creates a new client using the given HTTP client and configuration.
    pub fn new(client: &'a Client, config: &'a OrsConfig) -> Self {
        Self { client, config }
    }

    /// Fetches a round-trip loop for the given spec.
    ///
    /// The requested length is clamped to the bounds the API accepts, and the
    /// decoded geometry is reversed when the spec asks for a counterclockwise
    /// loop.
    pub async fn round_trip(&self, spec: &RouteSpec) -> anyhow::Result<DirectionsRoute> {
        let body = DirectionsBody::round_trip(
            &spec.start,
            RoundTripOptions {
                length: spec
                    .length_meters
                    .clamp(MIN_ROUND_TRIP_METERS, MAX_ROUND_TRIP_METERS),
                points: ROUND_TRIP_POINTS,
                seed: spec.seed,
            },
        );

        let mut route = self.directions_request(spec.profile, &body).await?;
        if spec.direction == Direction::Counterclockwise {
            route.points.reverse();
        }
        Ok(route)
    }

    /// Fetches a route visiting the given waypoints in order.
    pub async fn directions(
        &self,
        profile: Profile,
        waypoints: &[LatLon],
    ) -> anyhow::Result<DirectionsRoute> {
        if waypoints.len() < 2 {
            bail!(
                "At least two waypoints are required, got {}",
                waypoints.len()
            );
        }
        let body = DirectionsBody::waypoints(waypoints);
        self.directions_request(profile, &body).await
    }

    /// Sends a directions request and decodes the GeoJSON response.
    async fn directions_request(
        &self,
        profile: Profile,
        body: &DirectionsBody,
    ) -> anyhow::Result<DirectionsRoute> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.server,
            profile.as_api_str()
        );
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.config.api_key)
            .json(body)
            .send()
            .await
            .context("Failed to send directions request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read directions response")?;
        if !status.is_success() {
            bail!("Directions request failed with status {status}: {text}");
        }

        let route = decode_response(&text)?;
        match &route.summary {
            Some(summary) => info!(
                "Fetched a route of {} points ({:.0} m, {:.0} s)",
                route.points.len(),
                summary.distance,
                summary.duration
            ),
            None => info!("Fetched a route of {} points", route.points.len()),
        }
        Ok(route)
    }
}
