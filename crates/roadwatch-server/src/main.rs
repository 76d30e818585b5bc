//! Roadwatch server - road condition API with hazard-aware route planning.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roadwatch_server::config::Config;
use roadwatch_server::state::AppState;
use roadwatch_server::{api, loops};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roadwatch_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting roadwatch server...");

    let config = Config::from_env();
    let port = config.server_port;
    let state = Arc::new(AppState::new(config));

    // The dataset may not exist yet on a fresh deployment; the refresh
    // loop picks it up once the pipeline publishes it.
    match state.dataset.reload().await {
        Ok(snapshot) => tracing::info!("Loaded camera dataset ({} cameras)", snapshot.cameras.len()),
        Err(err) => tracing::warn!("Camera dataset not loaded yet: {err:#}"),
    }

    let (shutdown_tx, _) = broadcast::channel(1);
    tokio::spawn(loops::dataset_refresh_loop::run_refresh_loop(
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    // Build the app; the front end is served elsewhere, so CORS stays open.
    let app = api::routes()
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = shutdown_tx.send(());
        })
        .await?;

    Ok(())
}
