// src/cycle.rs
// One scheduled run: for every (source, region) key, fetch, decide, render,
// deliver, then apply state. State only moves after a successful send, so a
// failed or aborted tick is always safe to retry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use metrics::{counter, gauge};

use crate::dedup::DedupTracker;
use crate::engine::{self, Plan};
use crate::fetch::TrendProvider;
use crate::history::{CycleRecord, History};
use crate::notify::{Deliver, OutboundMessage};
use crate::render;
use crate::schedule::{ScheduleBucket, ScheduleGate};
use crate::store::SnapshotStore;
use crate::trend::{Snapshot, Source, TrendKey};

/// Per-run knobs lifted from `BotConfig` (the bot itself owns the rest).
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub utc_offset_hours: i32,
    pub regions: Vec<String>,
    pub fetch_retries: u32,
    pub fetch_retry_delay_secs: u64,
    pub send_gap_secs: u64,
    pub quiet_notice: bool,
}

/// What happened for one key during a run, kept for /api/status.
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub key: TrendKey,
    pub emitted: usize,
    pub delivered: bool,
}

pub struct Bot {
    pub gate: ScheduleGate,
    pub providers: Vec<Box<dyn TrendProvider>>,
    pub store: SnapshotStore,
    pub dedup: DedupTracker,
    pub deliver: Box<dyn Deliver>,
    pub history: Arc<History>,
    pub settings: RunSettings,
}

impl Bot {
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.settings.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Utc::now().with_timezone(&offset)
    }

    /// One full scheduled run across every configured key.
    pub async fn run_once(&mut self) {
        let now_local = self.local_now();
        let bucket = self.gate.classify(now_local);
        counter!("cycles_total").increment(1);
        gauge!("last_cycle_ts").set(Utc::now().timestamp() as f64);
        tracing::info!(?bucket, now = %now_local.format("%Y-%m-%d %H:%M"), "run start");

        if bucket == ScheduleBucket::Quiet {
            self.quiet_run(bucket).await;
            return;
        }

        // One epoch spans all keys: reset before the first mark of the cycle.
        if bucket == ScheduleBucket::FullRefresh {
            self.dedup.reset(Utc::now());
            if let Err(e) = self.dedup.persist().await {
                tracing::warn!(error = %e, "persisting dedup reset failed");
            }
        }

        let regions = self.settings.regions.clone();
        for p_idx in 0..self.providers.len() {
            for region in &regions {
                let key = TrendKey::new(self.providers[p_idx].source(), region.clone());

                let fetched = if bucket == ScheduleBucket::DailySummary {
                    // The recap re-sends the stored snapshot; no fetch.
                    None
                } else {
                    self.fetch_with_retry(p_idx, region).await
                };
                if fetched.is_none() && bucket != ScheduleBucket::DailySummary {
                    counter!("fetch_errors_total").increment(1);
                }

                match self.process_key(bucket, &key, fetched, now_local).await {
                    Ok(outcome) => {
                        self.history.push(CycleRecord {
                            ts: Utc::now(),
                            key: key.stem(),
                            bucket,
                            emitted: outcome.emitted,
                            delivered: outcome.delivered,
                        });
                        if outcome.delivered && self.settings.send_gap_secs > 0 {
                            tokio::time::sleep(Duration::from_secs(self.settings.send_gap_secs))
                                .await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "key processing failed");
                    }
                }
            }
        }
        tracing::info!(?bucket, "run finished");
    }

    /// Quiet window: at most the courtesy notice, never state changes.
    async fn quiet_run(&mut self, bucket: ScheduleBucket) {
        let plan = engine::decide(bucket, None, None, &Default::default());
        if matches!(plan, Plan::QuietNotice) && self.settings.quiet_notice {
            let msg = OutboundMessage::new(render::night_notice());
            if let Err(e) = self.deliver.deliver(&msg).await {
                tracing::warn!(error = %e, "night notice delivery failed");
                counter!("delivery_errors_total").increment(1);
            }
        } else {
            tracing::info!("quiet window, nothing sent");
        }
    }

    async fn fetch_with_retry(&self, p_idx: usize, region: &str) -> Option<Snapshot> {
        let provider = &self.providers[p_idx];
        for attempt in 1..=self.settings.fetch_retries.max(1) {
            match provider.fetch(region).await {
                Ok(snapshot) => return Some(snapshot),
                Err(e) => {
                    tracing::warn!(
                        source = provider.source().as_str(),
                        region,
                        attempt,
                        error = %e,
                        "fetch failed"
                    );
                    if attempt < self.settings.fetch_retries {
                        tokio::time::sleep(Duration::from_secs(
                            self.settings.fetch_retry_delay_secs,
                        ))
                        .await;
                    }
                }
            }
        }
        None
    }

    /// Decide and deliver for one key, applying state only on success.
    pub async fn process_key(
        &mut self,
        bucket: ScheduleBucket,
        key: &TrendKey,
        fetched: Option<Snapshot>,
        now_local: DateTime<FixedOffset>,
    ) -> Result<KeyOutcome> {
        let old = self.store.load(key).await;
        let known = self.dedup.known_for(key);
        let plan = engine::decide(bucket, old.as_ref(), fetched.as_ref(), &known);

        let (entries, update) = match plan {
            Plan::Silent | Plan::QuietNotice => {
                tracing::info!(key = %key, "nothing to report");
                return Ok(KeyOutcome {
                    key: key.clone(),
                    emitted: 0,
                    delivered: false,
                });
            }
            Plan::Announce { entries, update } => (entries, update),
        };

        let text = render::render_announcement(bucket, key, &entries, now_local);
        let mut msg = OutboundMessage::new(text);
        if key.source == Source::Youtube {
            msg = msg.mirrored();
        }

        match self.deliver.deliver(&msg).await {
            Ok(()) => {
                if let Some(update) = update {
                    self.dedup.mark_known(key, update.mark_known);
                    // Flush before any further send on this run.
                    self.dedup.persist().await?;
                    self.store.save(key, &update.snapshot).await?;
                }
                counter!("notifications_sent_total").increment(1);
                tracing::info!(key = %key, emitted = entries.len(), "notification delivered");
                Ok(KeyOutcome {
                    key: key.clone(),
                    emitted: entries.len(),
                    delivered: true,
                })
            }
            Err(e) => {
                counter!("delivery_errors_total").increment(1);
                tracing::warn!(key = %key, error = %e, "delivery failed, state left untouched");
                Ok(KeyOutcome {
                    key: key.clone(),
                    emitted: entries.len(),
                    delivered: false,
                })
            }
        }
    }
}
