//! Route planning orchestrator.
//!
//! One request is one linear flow: resolve both endpoints, fetch candidate
//! routes, match cameras and score each candidate, rank by score. Routing
//! itself never fails (the client falls back to a synthetic route), so the
//! only error conditions here are a missing dataset and unresolvable
//! endpoint tokens.

use std::cmp::Ordering;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use roadwatch_core::dataset::CameraDataset;
use roadwatch_core::models::{AnalyzedRoute, CandidateRoute, Coordinate, RoutePlan, SafetyLevel};
use roadwatch_core::proximity::cameras_near_route;
use roadwatch_core::scoring::score_route_safety;
use roadwatch_routing::{Geocoder, RoutingClient};

use crate::state::AppState;

/// How many hazardous cameras each analyzed route reports in detail.
const TOP_HAZARDS_LIMIT: usize = 5;

const DEFAULT_ALTERNATIVES: u32 = 3;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("camera data not available; run the classification pipeline to generate it")]
    DataUnavailable,
    #[error("could not resolve location '{token}'")]
    UnresolvableLocation { token: String },
    #[error("{0}")]
    InvalidInput(String),
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Either a `lon,lat` literal or a free-text address.
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub alternatives: Option<u32>,
}

/// Plan a route against the server's current dataset snapshot.
pub async fn plan_route(state: &AppState, request: &PlanRequest) -> Result<RoutePlan, PlanError> {
    // Scoring is meaningless without camera data, so bail before any
    // backend call.
    let snapshot = state.dataset.current().ok_or(PlanError::DataUnavailable)?;

    analyze(
        &snapshot.cameras,
        &state.routing,
        &state.geocoder,
        request,
        state.config.route_buffer_km,
    )
    .await
}

/// The planning flow itself, decoupled from `AppState` so tests can feed a
/// stub geocoder and an arbitrary backend list.
pub async fn analyze<G: Geocoder>(
    cameras: &CameraDataset,
    routing: &RoutingClient,
    geocoder: &G,
    request: &PlanRequest,
    buffer_km: f64,
) -> Result<RoutePlan, PlanError> {
    let origin_token = request.origin.trim();
    let destination_token = request.destination.trim();
    if origin_token.is_empty() {
        return Err(PlanError::InvalidInput("origin is required".to_string()));
    }
    if destination_token.is_empty() {
        return Err(PlanError::InvalidInput(
            "destination is required".to_string(),
        ));
    }

    let origin = resolve_location(origin_token, geocoder).await?;
    let destination = resolve_location(destination_token, geocoder).await?;
    let alternatives = request
        .alternatives
        .unwrap_or(DEFAULT_ALTERNATIVES)
        .clamp(1, 3);

    let candidates = routing
        .fetch_routes(origin, destination, alternatives, None)
        .await;

    let routes = rank_candidates(cameras, candidates, buffer_km);
    let recommended = routes.first().cloned();

    Ok(RoutePlan {
        origin,
        destination,
        routes,
        recommended,
        generated_at: Utc::now(),
    })
}

/// Analyze and rank candidate routes: match cameras, score, sort by score
/// descending, mark the best as recommended. `route_index` keeps each
/// route's position in the backend's original response.
pub fn rank_candidates(
    cameras: &CameraDataset,
    candidates: Vec<CandidateRoute>,
    buffer_km: f64,
) -> Vec<AnalyzedRoute> {
    let mut routes: Vec<AnalyzedRoute> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, route)| {
            let matches = cameras_near_route(&route.geometry, cameras, buffer_km);
            let safety = score_route_safety(&matches);
            let top_hazards = matches
                .iter()
                .filter(|m| m.safety_level == SafetyLevel::Hazardous)
                .take(TOP_HAZARDS_LIMIT)
                .cloned()
                .collect();

            AnalyzedRoute {
                route_index: index,
                is_recommended: false,
                distance_km: (route.distance_m / 1000.0 * 100.0).round() / 100.0,
                duration_min: (route.duration_s / 60.0 * 10.0).round() / 10.0,
                safety,
                matched_camera_count: matches.len(),
                top_hazards,
                geometry: route.geometry,
                legs: route.legs,
            }
        })
        .collect();

    // Stable sort: ties keep the backend's original preference order.
    routes.sort_by(|a, b| {
        b.safety
            .score
            .partial_cmp(&a.safety.score)
            .unwrap_or(Ordering::Equal)
    });
    if let Some(best) = routes.first_mut() {
        best.is_recommended = true;
    }
    routes
}

/// Resolve a location token: a `lon,lat` literal short-circuits, anything
/// else goes to the geocoder.
pub async fn resolve_location<G: Geocoder>(
    token: &str,
    geocoder: &G,
) -> Result<Coordinate, PlanError> {
    if let Some(coordinate) = parse_literal(token) {
        return Ok(coordinate);
    }

    match geocoder.geocode(token).await {
        Ok(Some(coordinate)) => Ok(coordinate),
        Ok(None) => Err(PlanError::UnresolvableLocation {
            token: token.to_string(),
        }),
        Err(err) => {
            tracing::warn!("geocoding '{token}' failed: {err:#}");
            Err(PlanError::UnresolvableLocation {
                token: token.to_string(),
            })
        }
    }
}

/// Parse `lon,lat`. Exactly two comma-separated floats, nothing more; range
/// validation is left to the caller.
fn parse_literal(token: &str) -> Option<Coordinate> {
    let mut parts = token.split(',');
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let lon: f64 = lon.trim().parse().ok()?;
    let lat: f64 = lat.trim().parse().ok()?;
    Some(Coordinate::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_lon_lat_parses() {
        let coordinate = parse_literal("-111.89,40.76").unwrap();
        assert_eq!(coordinate.lon, -111.89);
        assert_eq!(coordinate.lat, 40.76);
    }

    #[test]
    fn literal_tolerates_spaces() {
        assert!(parse_literal(" -111.89 , 40.76 ").is_some());
    }

    #[test]
    fn addresses_are_not_literals() {
        assert!(parse_literal("Park City, UT").is_none());
        assert!(parse_literal("Salt Lake City").is_none());
        assert!(parse_literal("-111.89,40.76,12.0").is_none());
        assert!(parse_literal("").is_none());
    }
}
