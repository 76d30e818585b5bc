//! Free-text geocoding against a Nominatim-compatible backend.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use roadwatch_core::models::Coordinate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "roadwatch-road-conditions/0.2";

/// Seam for address resolution so the planner can be tested with a stub.
pub trait Geocoder {
    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<Coordinate>>> + Send;
}

/// HTTP client for the Nominatim search API.
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

// Nominatim returns lon/lat as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lon: String,
    lat: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// The public OpenStreetMap Nominatim instance.
    pub fn public() -> Self {
        Self::new("https://nominatim.openstreetmap.org")
    }
}

impl Geocoder for NominatimClient {
    /// Look a free-text address up; first hit wins.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let hits: Vec<SearchHit> = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("geocoding request failed")?
            .error_for_status()
            .context("geocoding error status")?
            .json()
            .await
            .context("invalid geocoding response")?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let lon: f64 = hit.lon.parse().context("unparseable longitude")?;
        let lat: f64 = hit.lat.parse().context("unparseable latitude")?;
        Ok(Some(Coordinate::new(lon, lat)))
    }
}
