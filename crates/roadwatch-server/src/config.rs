//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub results_file: String,
    /// OSRM-compatible routing servers, tried in order.
    pub routing_backends: Vec<String>,
    pub geocoder_url: String,
    pub route_buffer_km: f64,
    pub refresh_interval_s: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("ROADWATCH_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            results_file: env::var("ROADWATCH_RESULTS_FILE").unwrap_or_else(|_| {
                "data/fast_classified/classification_results.json".to_string()
            }),
            routing_backends: env::var("ROADWATCH_OSRM_SERVERS")
                .map(|s| {
                    s.split(',')
                        .map(|url| url.trim().to_string())
                        .filter(|url| !url.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "http://router.project-osrm.org".to_string(),
                        "https://routing.openstreetmap.de/routed-car".to_string(),
                    ]
                }),
            geocoder_url: env::var("ROADWATCH_NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            route_buffer_km: env::var("ROADWATCH_ROUTE_BUFFER_KM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(roadwatch_core::proximity::DEFAULT_BUFFER_KM),
            refresh_interval_s: env::var("ROADWATCH_REFRESH_INTERVAL_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}
