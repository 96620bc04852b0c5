use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::ranker::Ranker;

/// Hard cap on per-request candidate bounds; keeps one request from fanning
/// out an unbounded number of catalog calls.
const MAX_RESULTS_CAP: u32 = 50;

#[derive(Clone)]
pub struct AppState {
    pub ranker: Arc<Ranker>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/rank", get(rank))
        .route("/admin/reload-ranking-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct RankQuery {
    topic: Option<String>,
    max_results: Option<u32>,
}

async fn rank(State(state): State<AppState>, Query(q): Query<RankQuery>) -> impl IntoResponse {
    let Some(topic) = q.topic else {
        return (StatusCode::BAD_REQUEST, "missing `topic` query parameter").into_response();
    };

    let limit = q.max_results.map(|n| n.clamp(1, MAX_RESULTS_CAP));
    let results = state.ranker.rank_with_limit(&topic, limit).await;
    Json(results).into_response()
}

async fn admin_reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.ranker.config().reload() {
        Ok(cfg) => (
            StatusCode::OK,
            format!(
                "reloaded: alpha={:.2} beta={:.2} penalty={:.2} max_results={} max_comments={}",
                cfg.alpha, cfg.beta, cfg.suspicion_penalty, cfg.max_results, cfg.max_comments
            ),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("reload failed: {e}"),
        ),
    }
}
