//! Shared application state.

use roadwatch_routing::{NominatimClient, RoutingBackend, RoutingClient};

use crate::config::Config;
use crate::dataset::DatasetStore;

pub struct AppState {
    pub config: Config,
    pub dataset: DatasetStore,
    pub routing: RoutingClient,
    pub geocoder: NominatimClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backends = config
            .routing_backends
            .iter()
            .enumerate()
            .map(|(index, url)| RoutingBackend::new(format!("backend-{index}"), url.clone()))
            .collect();

        Self {
            dataset: DatasetStore::new(&config.results_file),
            routing: RoutingClient::new(backends),
            geocoder: NominatimClient::new(config.geocoder_url.clone()),
            config,
        }
    }
}
