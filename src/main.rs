mod api;
mod catalog;
mod config;
mod db;
mod error;
mod stats;
mod types;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::db::{PriceStore, SqliteStore};
use crate::error::Result;
use crate::stats::PriceAggregator;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database (read-only; the ingest pipeline owns the schema) ---
    let store = SqliteStore::connect_read_only(&cfg.db_path, cfg.db_max_connections).await?;
    store.ping().await?;
    info!(
        "Database ready at {} ({} connections)",
        cfg.db_path, cfg.db_max_connections
    );

    // --- Price aggregation ---
    let aggregator = PriceAggregator::new(
        Arc::new(store),
        cfg.min_updated_at_secs,
        cfg.query_concurrency,
    );
    info!(
        "Freshness window {}s, {} concurrent pair queries per request",
        cfg.min_updated_at_secs, cfg.query_concurrency
    );

    // --- HTTP API server ---
    let api_state = ApiState {
        aggregator,
        health: Arc::new(HealthState::new()),
        latency: Arc::new(LatencyStats::new()),
        root_redirect_url: Arc::from(cfg.root_redirect_url.as_str()),
    };
    let app = router(api_state);
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP API listening on {}", cfg.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
