//! Snapshot store for the camera classification dataset.
//!
//! The classification pipeline publishes the results file with a
//! write-then-rename, so a whole-file read always sees a consistent
//! dataset. The store keeps the latest parsed snapshot behind a lock and
//! hands out `Arc` clones: one planning request works against one snapshot
//! for its whole duration no matter what the refresh loop swaps in.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

use roadwatch_core::dataset::CameraDataset;

/// One consistent view of the results file.
pub struct DatasetSnapshot {
    /// The file content as-is, served back on the conditions endpoints.
    pub raw: Value,
    pub cameras: CameraDataset,
    pub last_updated: DateTime<Utc>,
    /// File mtime at load time, used by the refresh loop to skip reloads.
    pub mtime: SystemTime,
}

pub struct DatasetStore {
    results_file: PathBuf,
    current: RwLock<Option<Arc<DatasetSnapshot>>>,
}

impl DatasetStore {
    pub fn new(results_file: impl Into<PathBuf>) -> Self {
        Self {
            results_file: results_file.into(),
            current: RwLock::new(None),
        }
    }

    pub fn results_file(&self) -> &Path {
        &self.results_file
    }

    /// The current snapshot, if one has been loaded.
    pub fn current(&self) -> Option<Arc<DatasetSnapshot>> {
        self.current
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    /// Re-read the results file and swap the parsed snapshot in.
    pub async fn reload(&self) -> Result<Arc<DatasetSnapshot>> {
        let bytes = tokio::fs::read(&self.results_file)
            .await
            .with_context(|| format!("reading {}", self.results_file.display()))?;
        let raw: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.results_file.display()))?;

        let mtime = tokio::fs::metadata(&self.results_file)
            .await
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|_| SystemTime::now());

        let cameras = CameraDataset::from_value(&raw);
        let snapshot = Arc::new(DatasetSnapshot {
            raw,
            cameras,
            last_updated: DateTime::<Utc>::from(mtime),
            mtime,
        });

        if let Ok(mut guard) = self.current.write() {
            *guard = Some(snapshot.clone());
        }
        Ok(snapshot)
    }

    /// Current mtime of the results file on disk.
    pub async fn file_mtime(&self) -> Option<SystemTime> {
        tokio::fs::metadata(&self.results_file)
            .await
            .and_then(|meta| meta.modified())
            .ok()
    }
}
