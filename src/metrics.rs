// src/metrics.rs
// Prometheus recorder plus one-time series registration.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("cycles_total", "Scheduled runs started.");
        describe_counter!("notifications_sent_total", "Messages delivered to the channel.");
        describe_counter!("delivery_errors_total", "Failed delivery attempts (after retries).");
        describe_counter!("fetch_errors_total", "Keys whose upstream fetch failed for a run.");
        describe_counter!("fetch_items_total", "Trend items parsed from upstream feeds.");
        describe_histogram!("fetch_parse_ms", "Upstream payload parse time in milliseconds.");
        describe_gauge!("last_cycle_ts", "Unix ts of the last scheduled run.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Call once, from the binary.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        ensure_metrics_described();
        Self { handle }
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
