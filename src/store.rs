// src/store.rs
// Last-known snapshot per (source, region) key, one JSON file each under the
// data dir. Missing or corrupt files are the bootstrap case, never an error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::trend::{Snapshot, TrendKey};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &TrendKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.stem()))
    }

    /// `None` means no usable prior snapshot (bootstrap).
    pub async fn load(&self, key: &TrendKey) -> Option<Snapshot> {
        let path = self.path_for(key);
        let body = fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str::<Snapshot>(&body) {
            Ok(snap) => Some(snap),
            Err(e) => {
                tracing::warn!(key = %key, path = %path.display(), error = %e,
                    "corrupt snapshot file, treating as bootstrap");
                None
            }
        }
    }

    /// Replace the stored snapshot wholesale.
    pub async fn save(&self, key: &TrendKey, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(key);
        let body = serde_json::to_vec_pretty(snapshot).context("serializing snapshot")?;
        fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(key = %key, items = snapshot.items.len(), "snapshot stored");
        Ok(())
    }
}
