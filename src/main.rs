//! rankwatch binary entrypoint.
//! Boots the ops HTTP surface and the scheduler loop that samples trending
//! feeds and notifies the Telegram channel about rank movement.
//!
//! See `README.md` for quickstart.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, Timelike};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rankwatch::config::BotConfig;
use rankwatch::cycle::{Bot, RunSettings};
use rankwatch::dedup::DedupTracker;
use rankwatch::fetch::{google::GoogleTrendsProvider, youtube::YoutubeTrendsProvider, TrendProvider};
use rankwatch::history::History;
use rankwatch::metrics::Metrics;
use rankwatch::notify::telegram::TelegramNotifier;
use rankwatch::store::SnapshotStore;
use rankwatch::trend::Source;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets live in .env.local, same as the rest of the deployment.
    dotenvy::from_filename(".env.local").ok();
    init_tracing();

    let cfg = BotConfig::load_default().context("loading configuration")?;
    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        regions = ?cfg.regions,
        trigger_hours = ?cfg.schedule.trigger_hours,
        "rankwatch starting"
    );

    let metrics = Metrics::init();
    let history = Arc::new(History::with_capacity(500));

    // Ops surface: /health, /api/status, /metrics.
    let ops = rankwatch::api::create_router(history.clone()).merge(metrics.router());
    let addr: SocketAddr = cfg
        .ops_addr
        .parse()
        .with_context(|| format!("invalid ops_addr {}", cfg.ops_addr))?;
    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                tracing::info!(%addr, "ops server listening");
                if let Err(e) = axum::serve(listener, ops).await {
                    tracing::error!(error = %e, "ops server stopped");
                }
            }
            Err(e) => tracing::error!(%addr, error = %e, "ops server bind failed"),
        }
    });

    let deliver = TelegramNotifier::from_env()?;
    let mut providers: Vec<Box<dyn TrendProvider>> = Vec::new();
    for source in &cfg.sources {
        match source {
            Source::Google => providers.push(Box::new(GoogleTrendsProvider::from_http())),
            Source::Youtube => providers.push(Box::new(
                YoutubeTrendsProvider::from_env()?.with_max_results(cfg.max_results),
            )),
        }
    }

    let store = SnapshotStore::new(&cfg.data_dir);
    let dedup = DedupTracker::load(cfg.data_dir.join("sent_items.json")).await;

    let mut bot = Bot {
        gate: cfg.schedule.clone(),
        providers,
        store,
        dedup,
        deliver: Box::new(deliver),
        history,
        settings: RunSettings {
            utc_offset_hours: cfg.utc_offset_hours,
            regions: cfg.regions.clone(),
            fetch_retries: cfg.fetch_retries,
            fetch_retry_delay_secs: cfg.fetch_retry_delay_secs,
            send_gap_secs: cfg.send_gap_secs,
            quiet_notice: cfg.quiet_notice,
        },
    };

    // One run right away: the bootstrap cycle always produces output for a
    // fresh deployment.
    bot.run_once().await;

    let run_hours = cfg.schedule.run_hours();
    let mut last_fired = current_slot(&bot);
    tracing::info!(?run_hours, "scheduler loop started");

    loop {
        tokio::time::sleep(std::time::Duration::from_secs(cfg.poll_interval_secs)).await;
        let now = bot.local_now();
        let slot = (now.ordinal(), now.hour());
        if run_hours.contains(&now.hour()) && Some(slot) != last_fired {
            last_fired = Some(slot);
            bot.run_once().await;
        }
    }
}

fn current_slot(bot: &Bot) -> Option<(u32, u32)> {
    let now = bot.local_now();
    Some((now.ordinal(), now.hour()))
}
