//! Study Video Ranker: binary entrypoint.
//! Boots the Axum HTTP server, wiring the catalog client, ranking config,
//! metrics recorder, and routes.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use study_video_ranker::api::{self, AppState};
use study_video_ranker::catalog::youtube::YouTubeCatalog;
use study_video_ranker::config::{RankingConfig, RankingConfigHandle};
use study_video_ranker::metrics::Metrics;
use study_video_ranker::ranker::Ranker;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("study_video_ranker=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    // Metrics recorder must be installed before the first counter is touched.
    let metrics = Metrics::init();

    // A missing API key fails startup here, with a remediation distinct from
    // "no results found": fix the configuration, don't retry the topic.
    let catalog = Arc::new(YouTubeCatalog::from_env().context("catalog configuration")?);

    let cfg = RankingConfig::load().context("ranking configuration")?;
    let ranker = Arc::new(Ranker::new(catalog, RankingConfigHandle::new(cfg)));

    let app = api::router(AppState { ranker }).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}
