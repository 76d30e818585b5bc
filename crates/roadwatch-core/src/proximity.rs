//! Matches point camera observations against a route polyline.

use std::cmp::Ordering;

use crate::dataset::CameraDataset;
use crate::models::{CameraRecord, Coordinate, ProximityMatch, RouteGeometry};
use crate::spatial::point_to_segment_km;

/// Cameras within 500 m of the route count as "on" it.
pub const DEFAULT_BUFFER_KM: f64 = 0.5;

/// Find cameras within `buffer_km` of the route, closest first.
///
/// Only classified cameras with a known location participate; failed
/// captures are skipped silently since they carry no evidence either way.
pub fn cameras_near_route(
    geometry: &RouteGeometry,
    dataset: &CameraDataset,
    buffer_km: f64,
) -> Vec<ProximityMatch> {
    let mut nearby = Vec::new();

    for record in dataset.records() {
        let CameraRecord::Classified {
            camera,
            classification,
        } = record
        else {
            continue;
        };
        let Some(location) = camera.location else {
            continue;
        };

        // Minimum distance over every consecutive segment of the polyline.
        let min_distance = geometry
            .coordinates
            .windows(2)
            .map(|pair| {
                point_to_segment_km(
                    location,
                    Coordinate::new(pair[0][0], pair[0][1]),
                    Coordinate::new(pair[1][0], pair[1][1]),
                )
            })
            .fold(f64::INFINITY, f64::min);

        if min_distance <= buffer_km {
            nearby.push(ProximityMatch {
                id: camera.id.clone(),
                name: camera.display_name.clone(),
                location,
                distance_km: (min_distance * 1000.0).round() / 1000.0,
                condition: classification.condition.clone(),
                confidence: classification.confidence,
                safety_level: classification.safety_level,
            });
        }
    }

    nearby.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    nearby
}
