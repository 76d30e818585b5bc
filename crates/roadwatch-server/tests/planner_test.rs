//! Planner tests against stub geocoders and unreachable routing backends.

use serde_json::json;

use roadwatch_core::dataset::CameraDataset;
use roadwatch_core::models::{CandidateRoute, Coordinate, RouteGeometry, SafetyLevel};
use roadwatch_core::spatial::haversine_km;
use roadwatch_routing::{Geocoder, RoutingBackend, RoutingClient};
use roadwatch_server::planner::{analyze, rank_candidates, PlanError, PlanRequest};

const SLC: Coordinate = Coordinate {
    lon: -111.8910,
    lat: 40.7608,
};
const PARK_CITY: Coordinate = Coordinate {
    lon: -111.4980,
    lat: 40.6461,
};

struct NoGeocode;

impl Geocoder for NoGeocode {
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Coordinate>> {
        panic!("geocoder called for '{query}'");
    }
}

struct FixedGeocode(Coordinate);

impl Geocoder for FixedGeocode {
    async fn geocode(&self, _query: &str) -> anyhow::Result<Option<Coordinate>> {
        Ok(Some(self.0))
    }
}

struct EmptyGeocode;

impl Geocoder for EmptyGeocode {
    async fn geocode(&self, _query: &str) -> anyhow::Result<Option<Coordinate>> {
        Ok(None)
    }
}

fn dead_backends() -> RoutingClient {
    RoutingClient::new(vec![RoutingBackend::new("dead", "http://127.0.0.1:9")])
}

fn request(origin: &str, destination: &str) -> PlanRequest {
    PlanRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        alternatives: Some(3),
    }
}

fn empty_dataset() -> CameraDataset {
    CameraDataset::from_value(&json!({}))
}

// One hazardous camera on the SLC-Park City midpoint.
fn hazard_dataset() -> CameraDataset {
    CameraDataset::from_value(&json!({
        "hazard-cam": {
            "status": "success",
            "camera": {"display_name": "Parleys Summit", "latitude": 40.70345, "longitude": -111.6945},
            "classification": {"condition": "snowy road", "confidence": 0.8, "safety_level": "hazardous"}
        }
    }))
}

#[tokio::test]
async fn literal_endpoints_never_call_the_geocoder() {
    let plan = analyze(
        &empty_dataset(),
        &dead_backends(),
        &NoGeocode,
        &request("-111.8910,40.7608", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect("plan");

    assert_eq!(plan.origin.lon, SLC.lon);
    assert_eq!(plan.origin.lat, SLC.lat);
    assert_eq!(plan.destination.lon, PARK_CITY.lon);
}

#[tokio::test]
async fn all_backends_down_yields_one_fallback_route() {
    let plan = analyze(
        &empty_dataset(),
        &dead_backends(),
        &NoGeocode,
        &request("-111.8910,40.7608", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect("plan");

    assert_eq!(plan.routes.len(), 1);
    let route = &plan.routes[0];
    assert_eq!(route.geometry.coordinates.len(), 11);
    assert!(route.is_recommended);

    // No cameras: optimistic default.
    assert_eq!(route.safety.score, 100.0);
    assert_eq!(route.safety.rating, SafetyLevel::Unknown);

    // Fallback duration is distance at 90 km/h.
    let expected_min = haversine_km(SLC, PARK_CITY) / 90.0 * 60.0;
    assert!((route.duration_min - expected_min).abs() < 0.1);

    let recommended = plan.recommended.as_ref().expect("recommended");
    assert_eq!(recommended.route_index, route.route_index);
}

#[tokio::test]
async fn hazard_camera_on_route_drops_score_to_seventy() {
    let plan = analyze(
        &hazard_dataset(),
        &dead_backends(),
        &NoGeocode,
        &request("-111.8910,40.7608", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect("plan");

    let route = &plan.routes[0];
    assert_eq!(route.safety.score, 70.0);
    assert_eq!(route.safety.rating, SafetyLevel::Hazardous);
    assert_eq!(route.safety.hazard_count, 1);
    assert_eq!(route.matched_camera_count, 1);
    assert_eq!(route.top_hazards.len(), 1);
    assert_eq!(route.top_hazards[0].id, "hazard-cam");
}

#[tokio::test]
async fn address_tokens_go_through_the_geocoder() {
    let geocoder = FixedGeocode(SLC);
    let plan = analyze(
        &empty_dataset(),
        &dead_backends(),
        &geocoder,
        &request("Salt Lake City, UT", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect("plan");

    assert_eq!(plan.origin.lon, SLC.lon);
    assert_eq!(plan.origin.lat, SLC.lat);
}

#[tokio::test]
async fn unresolvable_address_names_the_token() {
    let err = analyze(
        &empty_dataset(),
        &dead_backends(),
        &EmptyGeocode,
        &request("Nowhere Special", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect_err("should fail");

    match err {
        PlanError::UnresolvableLocation { token } => assert_eq!(token, "Nowhere Special"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_origin_is_invalid_input() {
    let err = analyze(
        &empty_dataset(),
        &dead_backends(),
        &NoGeocode,
        &request("   ", "-111.4980,40.6461"),
        0.5,
    )
    .await
    .expect_err("should fail");

    assert!(matches!(err, PlanError::InvalidInput(_)));
}

#[test]
fn ranking_puts_the_safest_route_first() {
    // Two candidates in backend order: first passes the hazard camera,
    // second swings clear of it.
    let through_hazard = CandidateRoute {
        geometry: RouteGeometry::line_string(vec![
            [SLC.lon, SLC.lat],
            [-111.6945, 40.70345],
            [PARK_CITY.lon, PARK_CITY.lat],
        ]),
        distance_m: 38_000.0,
        duration_s: 1_800.0,
        legs: json!([]),
    };
    let clear = CandidateRoute {
        geometry: RouteGeometry::line_string(vec![
            [SLC.lon, SLC.lat],
            [-111.6945, 40.90],
            [PARK_CITY.lon, PARK_CITY.lat],
        ]),
        distance_m: 45_000.0,
        duration_s: 2_200.0,
        legs: json!([]),
    };

    let ranked = rank_candidates(&hazard_dataset(), vec![through_hazard, clear], 0.5);

    assert_eq!(ranked.len(), 2);
    // The clear route (backend index 1) wins.
    assert_eq!(ranked[0].route_index, 1);
    assert!(ranked[0].is_recommended);
    assert!(!ranked[1].is_recommended);
    assert!(ranked[0].safety.score >= ranked[1].safety.score);
}

#[test]
fn equal_scores_keep_backend_order() {
    let route = |lat_offset: f64| CandidateRoute {
        geometry: RouteGeometry::line_string(vec![
            [SLC.lon, SLC.lat + lat_offset],
            [PARK_CITY.lon, PARK_CITY.lat + lat_offset],
        ]),
        distance_m: 38_000.0,
        duration_s: 1_800.0,
        legs: json!([]),
    };

    // Both far from any camera, so both score 100.
    let ranked = rank_candidates(&hazard_dataset(), vec![route(1.0), route(2.0)], 0.5);
    assert_eq!(ranked[0].route_index, 0);
    assert_eq!(ranked[1].route_index, 1);
}
