use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::view::render_table;
use crate::catalog::locations;
use crate::error::AppError;
use crate::stats::PriceAggregator;
use crate::types::{ChartResponse, ChartSeries, GoldSeries, PriceExtremeResult};

#[derive(Clone)]
pub struct ApiState {
    pub aggregator: PriceAggregator,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
    pub root_redirect_url: Arc<str>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/health", get(get_health))
        .route("/api/v1/stats/prices/:item", get(get_prices))
        .route("/api/v1/stats/view/:item", get(get_prices_view))
        .route("/api/v1/stats/charts/:item", get(get_charts))
        .route("/api/v1/stats/gold", get(get_gold))
        .route("/api/v1/stats/latency", get(get_stats_latency))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PricesQuery {
    /// Comma-separated location name fragments.
    pub locations: Option<String>,
    /// Seconds. Kept as a string: a malformed value is ignored, not rejected.
    pub age: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartsQuery {
    pub locations: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root_redirect(State(state): State<ApiState>) -> Redirect {
    Redirect::temporary(&state.root_redirect_url)
}

async fn price_stats(
    state: &ApiState,
    item: &str,
    params: &PricesQuery,
) -> Vec<PriceExtremeResult> {
    let started = Instant::now();
    let rows = state
        .aggregator
        .get_price_stats(
            item,
            params.locations.as_deref().unwrap_or_default(),
            params.age.as_deref(),
        )
        .await;
    state.latency.record(started.elapsed());
    state.health.record_price_request(now_secs());
    rows
}

async fn get_prices(
    State(state): State<ApiState>,
    Path(item): Path<String>,
    Query(params): Query<PricesQuery>,
) -> Json<Vec<PriceExtremeResult>> {
    Json(price_stats(&state, &item, &params).await)
}

async fn get_prices_view(
    State(state): State<ApiState>,
    Path(item): Path<String>,
    Query(params): Query<PricesQuery>,
) -> Html<String> {
    Html(render_table(&price_stats(&state, &item, &params).await))
}

async fn get_charts(
    State(state): State<ApiState>,
    Path(item): Path<String>,
    Query(params): Query<ChartsQuery>,
) -> Result<Json<Vec<ChartResponse>>, AppError> {
    let store = state.aggregator.store();
    let mut charts = Vec::new();

    for location in locations::resolve_csv(params.locations.as_deref().unwrap_or_default()) {
        let rows = store.market_stats(&item, location).await.map_err(|e| {
            state.health.inc_history_errors();
            error!(item_id = %item, location = %location, "charts read failed: {e}");
            e
        })?;
        if rows.is_empty() {
            continue;
        }

        let mut data = ChartSeries::default();
        for row in rows {
            // Milliseconds for the charting frontend.
            data.timestamps.push(row.timestamp * 1000);
            data.prices_min.push(row.price_min);
            data.prices_max.push(row.price_max);
            data.prices_avg.push(row.price_avg);
        }
        charts.push(ChartResponse { location, data });
    }

    Ok(Json(charts))
}

async fn get_gold(State(state): State<ApiState>) -> Result<Json<GoldSeries>, AppError> {
    let rows = state.aggregator.store().gold_prices().await.map_err(|e| {
        state.health.inc_history_errors();
        error!("gold read failed: {e}");
        e
    })?;

    let mut series = GoldSeries::default();
    for row in rows {
        series.timestamps.push(row.timestamp * 1000);
        series.prices.push(row.price);
    }
    Ok(Json(series))
}

async fn get_health(State(state): State<ApiState>) -> (StatusCode, Json<serde_json::Value>) {
    let db = state.aggregator.store().ping().await;
    let status = if db.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let last = state.health.last_price_request_at();
    (
        status,
        Json(serde_json::json!({
            "status": if db.is_ok() { "ok" } else { "degraded" },
            "database": db.err().map(|e| e.to_string()).unwrap_or_else(|| "ok".to_string()),
            "price_requests": state.health.price_requests(),
            "history_errors": state.health.history_errors(),
            "last_price_request_at": if last == 0 { None } else { Some(last) },
        })),
    )
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let (p50, p95, p99) = state.latency.percentiles();
    let ms = |us: Option<u64>| us.map(|v| v as f64 / 1000.0);
    Json(serde_json::json!({
        "samples": state.latency.len(),
        "p50_ms": ms(p50),
        "p95_ms": ms(p95),
        "p99_ms": ms(p99),
    }))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
