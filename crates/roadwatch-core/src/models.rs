//! Core data models for route safety analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A geographic position in decimal degrees.
///
/// Serialized as `{"longitude": .., "latitude": ..}` to match the wire
/// shape of route plans and camera records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "longitude")]
    pub lon: f64,
    #[serde(rename = "latitude")]
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// GeoJSON-style route geometry: an ordered polyline of `[lon, lat]` pairs.
///
/// Point order defines the direction of travel and must not be reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    pub fn line_string(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            geometry_type: "LineString".to_string(),
            coordinates,
        }
    }
}

/// A single route returned by a routing backend (or the synthetic fallback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub geometry: RouteGeometry,
    /// Total distance in meters.
    pub distance_m: f64,
    /// Total duration in seconds.
    pub duration_s: f64,
    /// Turn-by-turn legs, passed through untouched for display.
    #[serde(default)]
    pub legs: Value,
}

/// Categorical road condition derived from a camera image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Hazardous,
    Unknown,
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Hazardous => "hazardous",
            Self::Unknown => "unknown",
        })
    }
}

/// Why a camera produced no usable classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFailure {
    DownloadFailed,
    ClassificationFailed,
    Error,
}

/// Static camera metadata from the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraInfo {
    pub id: String,
    pub display_name: String,
    /// Some feed entries carry no position; those never match a route.
    pub location: Option<Coordinate>,
}

/// The classification payload attached to a successful observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub condition: String,
    pub confidence: f64,
    pub safety_level: SafetyLevel,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

/// One camera's entry in the dataset snapshot.
///
/// Only the `Classified` variant carries a classification payload; a failed
/// capture contributes no safety evidence, which matters to the proximity
/// matcher.
#[derive(Debug, Clone)]
pub enum CameraRecord {
    Classified {
        camera: CameraInfo,
        classification: Classification,
    },
    Failed {
        camera: CameraInfo,
        reason: CaptureFailure,
    },
}

impl CameraRecord {
    pub fn camera(&self) -> &CameraInfo {
        match self {
            Self::Classified { camera, .. } | Self::Failed { camera, .. } => camera,
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Classified { classification, .. } => Some(classification),
            Self::Failed { .. } => None,
        }
    }

    pub fn safety_level(&self) -> Option<SafetyLevel> {
        self.classification().map(|c| c.safety_level)
    }
}

/// A camera found within the buffer distance of a route polyline.
#[derive(Debug, Clone, Serialize)]
pub struct ProximityMatch {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinate,
    /// Minimum distance from the camera to the route, in kilometers.
    pub distance_km: f64,
    pub condition: String,
    pub confidence: f64,
    pub safety_level: SafetyLevel,
}

/// Aggregate safety statistics for one route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyScore {
    /// 0 (worst) to 100 (best).
    pub score: f64,
    pub rating: SafetyLevel,
    pub hazard_count: usize,
    pub caution_count: usize,
    pub safe_count: usize,
    /// All matched cameras, including ones with an unknown level.
    pub total: usize,
}

/// One candidate route annotated with camera safety evidence.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedRoute {
    /// Position in the routing backend's original response.
    pub route_index: usize,
    pub is_recommended: bool,
    pub distance_km: f64,
    pub duration_min: f64,
    pub safety: SafetyScore,
    pub matched_camera_count: usize,
    /// Up to five hazardous cameras, closest first.
    pub top_hazards: Vec<ProximityMatch>,
    pub geometry: RouteGeometry,
    pub legs: Value,
}

/// The full planning result: ranked routes, best first.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub routes: Vec<AnalyzedRoute>,
    pub recommended: Option<AnalyzedRoute>,
    pub generated_at: DateTime<Utc>,
}
