pub mod dataset;
pub mod models;
pub mod proximity;
pub mod scoring;
pub mod spatial;

pub use dataset::{CameraDataset, DatasetStats};
pub use models::{
    AnalyzedRoute, CameraInfo, CameraRecord, CandidateRoute, CaptureFailure, Classification,
    Coordinate, ProximityMatch, RouteGeometry, RoutePlan, SafetyLevel, SafetyScore,
};
pub use proximity::{cameras_near_route, DEFAULT_BUFFER_KM};
pub use scoring::score_route_safety;
pub use spatial::{haversine_km, point_to_segment_km};
