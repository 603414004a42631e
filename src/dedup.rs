// src/dedup.rs
// Tracks which identities have already been surfaced to the channel in the
// current epoch, so "new entry" notifications never repeat between resets.
// File-backed JSON; a corrupt or missing file degrades to an empty tracker
// (worst case is one duplicate notification, never data loss).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::trend::TrendKey;

/// Persisted form. Identities are scoped per `{source}_{region}` stem so two
/// sources can never collide on a coincidentally equal identity string. One
/// epoch still covers all keys: `reset` clears every namespace at once.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DedupState {
    #[serde(default)]
    pub known: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct DedupTracker {
    path: PathBuf,
    state: DedupState,
}

impl DedupTracker {
    /// Load from `path`, falling back to an empty tracker on any read or
    /// parse failure.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path).await {
            Ok(s) => match serde_json::from_str::<DedupState>(&s) {
                Ok(st) => st,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt dedup state, starting empty");
                    DedupState::default()
                }
            },
            Err(_) => DedupState::default(),
        };
        let total: usize = state.known.values().map(|s| s.len()).sum();
        tracing::info!(path = %path.display(), identities = total, "dedup state loaded");
        Self { path, state }
    }

    pub fn is_known(&self, key: &TrendKey, identity: &str) -> bool {
        self.state
            .known
            .get(&key.stem())
            .is_some_and(|set| set.contains(identity))
    }

    /// The known set for one key, cloned for the pure decision engine.
    pub fn known_for(&self, key: &TrendKey) -> BTreeSet<String> {
        self.state.known.get(&key.stem()).cloned().unwrap_or_default()
    }

    /// Idempotent union into the key's namespace.
    pub fn mark_known<I>(&mut self, key: &TrendKey, identities: I)
    where
        I: IntoIterator<Item = String>,
    {
        let set = self.state.known.entry(key.stem()).or_default();
        for id in identities {
            set.insert(id);
        }
    }

    /// Start a new epoch: every namespace cleared, reset time recorded.
    /// Invoked exactly once per full-refresh cycle, before any `mark_known`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.state.known.clear();
        self.state.reset_at = Some(now);
        tracing::info!("dedup epoch reset");
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.state.reset_at
    }

    /// Flush to disk. Called after every mutation that precedes a send, so a
    /// crash after a successful send cannot resend the same entries.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = serde_json::to_vec_pretty(&self.state).context("serializing dedup state")?;
        fs::write(&self.path, body)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
