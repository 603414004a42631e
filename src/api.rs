// src/api.rs
// Small ops surface: liveness, recent run outcomes. /metrics is merged in
// from `metrics::Metrics::router` by the binary.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::history::{CycleRecord, History};

#[derive(Clone)]
pub struct AppState {
    history: Arc<History>,
}

pub fn create_router(history: Arc<History>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/status", get(status))
        .layer(CorsLayer::very_permissive())
        .with_state(AppState { history })
}

#[derive(serde::Deserialize)]
struct StatusQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(serde::Serialize)]
struct StatusResp {
    recent: Vec<CycleRecord>,
}

async fn status(State(state): State<AppState>, Query(q): Query<StatusQuery>) -> Json<StatusResp> {
    Json(StatusResp {
        recent: state.history.snapshot_last_n(q.limit.min(1000)),
    })
}
