//! Spatial math for camera-to-route distance calculations.

use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Minimum distance from a point to a polyline segment, in kilometers.
///
/// The projection parameter is computed in raw lon/lat degree space, which
/// only holds up at the short segment lengths road geometry produces; the
/// final leg back to the point is haversine. Kept as an approximation on
/// purpose: it is cheap and accurate enough at the sub-kilometer buffer
/// scale the matcher operates at.
pub fn point_to_segment_km(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    // Degenerate segment collapses to a point.
    if start.lon == end.lon && start.lat == end.lat {
        return haversine_km(point, start);
    }

    let dx = end.lon - start.lon;
    let dy = end.lat - start.lat;

    // t = ((P-S) . (E-S)) / |E-S|^2, clamped to stay on the segment
    let t = (((point.lon - start.lon) * dx + (point.lat - start.lat) * dy) / (dx * dx + dy * dy))
        .clamp(0.0, 1.0);

    let closest = Coordinate::new(start.lon + t * dx, start.lat + t * dy);
    haversine_km(point, closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // ~111km per degree of latitude at the equator
        let dist = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((dist - 111.19).abs() < 0.1, "got {dist}");
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let slc = Coordinate::new(-111.8910, 40.7608);
        assert!(haversine_km(slc, slc) < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(-111.8910, 40.7608);
        let b = Coordinate::new(-111.4980, 40.6461);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_never_exceeds_endpoint_distance() {
        let p = Coordinate::new(-111.7, 40.7);
        let s = Coordinate::new(-111.9, 40.76);
        let e = Coordinate::new(-111.5, 40.65);
        let d = point_to_segment_km(p, s, e);
        assert!(d <= haversine_km(p, s) + 1e-9);
        assert!(d <= haversine_km(p, e) + 1e-9);
    }

    #[test]
    fn point_on_segment_is_near_zero() {
        let s = Coordinate::new(-111.9, 40.0);
        let e = Coordinate::new(-111.5, 40.0);
        let midpoint = Coordinate::new(-111.7, 40.0);
        assert!(point_to_segment_km(midpoint, s, e) < 1e-6);
    }

    #[test]
    fn degenerate_segment_falls_back_to_point_distance() {
        let p = Coordinate::new(-111.7, 40.7);
        let s = Coordinate::new(-111.9, 40.76);
        let d = point_to_segment_km(p, s, s);
        assert!((d - haversine_km(p, s)).abs() < 1e-12);
    }

    #[test]
    fn point_beyond_segment_end_clamps_to_endpoint() {
        let s = Coordinate::new(-111.9, 40.0);
        let e = Coordinate::new(-111.8, 40.0);
        // Well past the east end; closest point must be the endpoint itself.
        let p = Coordinate::new(-111.5, 40.0);
        let d = point_to_segment_km(p, s, e);
        assert!((d - haversine_km(p, e)).abs() < 1e-9);
    }
}
