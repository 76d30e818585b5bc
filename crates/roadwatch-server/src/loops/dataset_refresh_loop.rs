//! Loop to pick up new classification results published by the pipeline.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

/// Watch the results file and reload the snapshot when its mtime changes.
pub async fn run_refresh_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval(Duration::from_secs(state.config.refresh_interval_s.max(1)));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Dataset refresh loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let on_disk = state.dataset.file_mtime().await;
                let loaded = state.dataset.current().map(|snapshot| snapshot.mtime);

                match on_disk {
                    None => {
                        tracing::debug!(
                            "results file {} not present yet",
                            state.dataset.results_file().display()
                        );
                    }
                    Some(mtime) if Some(mtime) == loaded => {}
                    Some(_) => match state.dataset.reload().await {
                        Ok(snapshot) => tracing::info!(
                            "Reloaded camera dataset ({} cameras)",
                            snapshot.cameras.len()
                        ),
                        Err(err) => tracing::error!("Dataset reload failed: {err:#}"),
                    },
                }
            }
        }
    }
}
