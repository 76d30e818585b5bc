//! Routing backend HTTP client with ordered failover.
//!
//! Backends are tried strictly in list order, one attempt each; the first
//! backend that answers with usable routes wins. The client never fails:
//! when every backend is down it synthesizes a straight-line route so
//! downstream scoring keeps working, just with coarse geometry and no
//! turn-by-turn steps.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{timeout, Instant};

use roadwatch_core::models::{CandidateRoute, Coordinate, RouteGeometry};
use roadwatch_core::spatial::haversine_km;

/// One attempt per backend, bounded by this timeout.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// OSRM-compatible servers cap alternatives at 3.
const BACKEND_MAX_ALTERNATIVES: u32 = 3;

/// Assumed average speed for the synthetic fallback route.
const FALLBACK_SPEED_KMH: f64 = 90.0;

/// Fallback geometry is interpolated over this many segments (11 points).
const FALLBACK_SEGMENTS: usize = 10;

const USER_AGENT: &str = "roadwatch-road-conditions/0.2";

/// A routing service endpoint. Priority order is list order.
#[derive(Debug, Clone)]
pub struct RoutingBackend {
    pub name: String,
    pub base_url: String,
}

impl RoutingBackend {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// HTTP client over an ordered list of OSRM-compatible backends.
pub struct RoutingClient {
    client: Client,
    backends: Vec<RoutingBackend>,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: RouteGeometry,
    #[serde(default)]
    legs: Value,
}

impl RoutingClient {
    pub fn new(backends: Vec<RoutingBackend>) -> Self {
        Self {
            client: Client::builder()
                .timeout(ATTEMPT_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            backends,
        }
    }

    /// The public OSRM demo servers, in preference order.
    pub fn public_osrm() -> Self {
        Self::new(vec![
            RoutingBackend::new("osrm-demo", "http://router.project-osrm.org"),
            RoutingBackend::new("osm-de", "https://routing.openstreetmap.de/routed-car"),
        ])
    }

    /// Fetch candidate routes between two points. Never fails: exhausting
    /// every backend yields the straight-line fallback instead.
    ///
    /// An optional deadline clamps each attempt; once past it, remaining
    /// backends are skipped and the fallback is returned directly.
    pub async fn fetch_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
        deadline: Option<Instant>,
    ) -> Vec<CandidateRoute> {
        let wanted = alternatives.min(BACKEND_MAX_ALTERNATIVES);

        for backend in &self.backends {
            let Some(budget) = attempt_budget(deadline) else {
                tracing::warn!("deadline reached before trying backend {}", backend.name);
                break;
            };

            match timeout(budget, self.attempt(backend, origin, destination, wanted)).await {
                Ok(Ok(routes)) => {
                    tracing::debug!(
                        "backend {} returned {} route(s)",
                        backend.name,
                        routes.len()
                    );
                    return routes;
                }
                Ok(Err(err)) => {
                    tracing::warn!("routing backend {} failed: {err:#}", backend.name);
                }
                Err(_) => {
                    tracing::warn!("routing backend {} timed out", backend.name);
                }
            }
        }

        tracing::warn!("all routing backends failed, using straight-line fallback");
        vec![fallback_route(origin, destination)]
    }

    async fn attempt(
        &self,
        backend: &RoutingBackend,
        origin: Coordinate,
        destination: Coordinate,
        alternatives: u32,
    ) -> Result<Vec<CandidateRoute>> {
        // OSRM expects lon,lat order in the path.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            backend.base_url.trim_end_matches('/'),
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("alternatives", alternatives.to_string()),
                ("steps", "true".to_string()),
                ("geometries", "geojson".to_string()),
                ("overview", "full".to_string()),
            ])
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("error status")?;

        let body: OsrmResponse = response.json().await.context("invalid response body")?;

        if body.code != "Ok" {
            bail!("backend reported code {:?}", body.code);
        }
        if body.routes.is_empty() {
            bail!("backend returned no routes");
        }

        Ok(body
            .routes
            .into_iter()
            .map(|route| CandidateRoute {
                geometry: route.geometry,
                distance_m: route.distance,
                duration_s: route.duration,
                legs: route.legs,
            })
            .collect())
    }
}

/// Time available for the next attempt, or `None` when the deadline has
/// already passed.
fn attempt_budget(deadline: Option<Instant>) -> Option<Duration> {
    match deadline {
        None => Some(ATTEMPT_TIMEOUT),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                None
            } else {
                Some(remaining.min(ATTEMPT_TIMEOUT))
            }
        }
    }
}

/// Straight-line route between two points: evenly interpolated geometry,
/// duration at an assumed 90 km/h, no legs.
pub fn fallback_route(origin: Coordinate, destination: Coordinate) -> CandidateRoute {
    let distance_km = haversine_km(origin, destination);
    let duration_s = distance_km / FALLBACK_SPEED_KMH * 3600.0;

    let coordinates = (0..=FALLBACK_SEGMENTS)
        .map(|i| {
            let t = i as f64 / FALLBACK_SEGMENTS as f64;
            [
                origin.lon + t * (destination.lon - origin.lon),
                origin.lat + t * (destination.lat - origin.lat),
            ]
        })
        .collect();

    CandidateRoute {
        geometry: RouteGeometry::line_string(coordinates),
        distance_m: distance_km * 1000.0,
        duration_s,
        legs: Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLC: Coordinate = Coordinate {
        lon: -111.8910,
        lat: 40.7608,
    };
    const PARK_CITY: Coordinate = Coordinate {
        lon: -111.4980,
        lat: 40.6461,
    };

    #[test]
    fn fallback_route_has_eleven_points() {
        let route = fallback_route(SLC, PARK_CITY);
        assert_eq!(route.geometry.coordinates.len(), 11);
        assert_eq!(route.geometry.coordinates[0], [SLC.lon, SLC.lat]);
        let last = route.geometry.coordinates[10];
        assert!((last[0] - PARK_CITY.lon).abs() < 1e-9);
        assert!((last[1] - PARK_CITY.lat).abs() < 1e-9);
    }

    #[test]
    fn fallback_duration_assumes_ninety_kmh() {
        let route = fallback_route(SLC, PARK_CITY);
        let expected_km = haversine_km(SLC, PARK_CITY);
        assert!((route.distance_m - expected_km * 1000.0).abs() < 1e-6);
        assert!((route.duration_s - expected_km / 90.0 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn fallback_has_empty_legs() {
        let route = fallback_route(SLC, PARK_CITY);
        assert_eq!(route.legs, Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn unreachable_backends_fall_back_to_synthetic_route() {
        // Port 9 (discard) refuses connections immediately.
        let client = RoutingClient::new(vec![
            RoutingBackend::new("dead-1", "http://127.0.0.1:9"),
            RoutingBackend::new("dead-2", "http://127.0.0.1:9"),
        ]);

        let routes = client.fetch_routes(SLC, PARK_CITY, 3, None).await;
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].geometry.coordinates.len(), 11);
    }

    #[tokio::test]
    async fn expired_deadline_still_produces_fallback() {
        let client = RoutingClient::new(vec![RoutingBackend::new(
            "dead",
            "http://127.0.0.1:9",
        )]);

        let deadline = Instant::now();
        let routes = client
            .fetch_routes(SLC, PARK_CITY, 3, Some(deadline))
            .await;
        assert_eq!(routes.len(), 1);
    }
}
