pub mod client;
pub mod geocode;

pub use client::{fallback_route, RoutingBackend, RoutingClient};
pub use geocode::{Geocoder, NominatimClient};
