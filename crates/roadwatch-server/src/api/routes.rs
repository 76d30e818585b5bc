//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::planner::{self, PlanError, PlanRequest};
use crate::state::AppState;

use roadwatch_core::models::{CameraRecord, RoutePlan, SafetyLevel};

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .route("/api/conditions", get(get_conditions))
        .route("/api/stats", get(get_stats))
        .route("/api/camera/:camera_id", get(get_camera))
        .route("/api/route/plan", post(plan_route_handler))
}

type ApiError = (StatusCode, Json<Value>);

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "roadwatch road condition api",
        "timestamp": Utc::now(),
    }))
}

/// Full dataset plus aggregate stats.
async fn get_conditions(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let snapshot = state.dataset.current().ok_or_else(dataset_missing)?;

    Ok(Json(json!({
        "data": snapshot.raw,
        "stats": snapshot.cameras.stats(),
        "last_updated": snapshot.last_updated,
        "timestamp": Utc::now(),
    })))
}

/// Stats only, with a sample of hazardous cameras. Smaller and faster than
/// the full conditions payload.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let snapshot = state.dataset.current().ok_or_else(dataset_missing)?;

    let hazardous_cameras: Vec<Value> = snapshot
        .cameras
        .records()
        .filter_map(|record| match record {
            CameraRecord::Classified {
                camera,
                classification,
            } if classification.safety_level == SafetyLevel::Hazardous => Some(json!({
                "id": camera.id,
                "name": camera.display_name,
                "lat": camera.location.map(|c| c.lat),
                "lon": camera.location.map(|c| c.lon),
                "condition": classification.condition,
                "confidence": classification.confidence,
            })),
            _ => None,
        })
        .take(10)
        .collect();

    Ok(Json(json!({
        "stats": snapshot.cameras.stats(),
        "hazardous_cameras": hazardous_cameras,
        "last_updated": snapshot.last_updated,
        "timestamp": Utc::now(),
    })))
}

async fn get_camera(
    State(state): State<Arc<AppState>>,
    Path(camera_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = state.dataset.current().ok_or_else(dataset_missing)?;

    snapshot
        .raw
        .get(&camera_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "camera_not_found",
                    "message": format!("no camera with id '{camera_id}'"),
                })),
            )
        })
}

/// Plan a route with hazard detection.
///
/// The extractor rejection is taken by hand so a body with missing or
/// malformed fields gets the same `{error, message}` shape as every other
/// planning failure instead of axum's plain-text default.
async fn plan_route_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<RoutePlan>, ApiError> {
    let Json(request) = request
        .map_err(|rejection| plan_error_response(PlanError::InvalidInput(rejection.body_text())))?;

    planner::plan_route(&state, &request)
        .await
        .map(Json)
        .map_err(plan_error_response)
}

fn dataset_missing() -> ApiError {
    plan_error_response(PlanError::DataUnavailable)
}

fn plan_error_response(err: PlanError) -> ApiError {
    let (status, code) = match &err {
        PlanError::DataUnavailable => (StatusCode::NOT_FOUND, "data_unavailable"),
        PlanError::UnresolvableLocation { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "unresolvable_location")
        }
        PlanError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
    };

    (
        status,
        Json(json!({
            "error": code,
            "message": err.to_string(),
        })),
    )
}
