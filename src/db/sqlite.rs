use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use crate::catalog::Location;
use crate::db::models::{GoldPriceRow, MarketOrderRow, MarketStatsRow};
use crate::db::store::{PriceStore, QueryError};
use crate::stats::selector::extremal_cmp;
use crate::types::{AuctionType, OrderObservation, OrderSpec};

const DISTINCT_ITEM_IDS: &str = r#"
    SELECT item_id
    FROM market_orders
    WHERE item_id LIKE ? AND updated_at >= ?
    GROUP BY item_id
"#;

// Every qualifying row of the most recent minute bucket (`updated_at / 60`),
// oldest stored row first. The extreme inside that minute is picked by
// `extremal_cmp`; the bound parameters are repeated for the subquery.
const SELECT_LATEST_MINUTE: &str = r#"
    SELECT item_id, location, auction_type, price, updated_at
    FROM market_orders
    WHERE location = ? AND item_id = ? AND auction_type = ? AND updated_at >= ?
      AND updated_at / 60 = (
          SELECT MAX(updated_at / 60)
          FROM market_orders
          WHERE location = ? AND item_id = ? AND auction_type = ? AND updated_at >= ?
      )
    ORDER BY id ASC
"#;

const MARKET_STATS: &str = r#"
    SELECT item_id, location, price_min, price_max, price_avg, timestamp
    FROM market_stats
    WHERE item_id = ? AND location = ?
    ORDER BY timestamp ASC
"#;

const GOLD_PRICES: &str = "SELECT price, timestamp FROM gold_prices ORDER BY timestamp ASC";

/// `PriceStore` over the SQLite database filled by the ingest pipeline.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens `path` read-only. This service never writes to the market tables.
    pub async fn connect_read_only(path: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))?.read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PriceStore for SqliteStore {
    async fn distinct_item_ids(
        &self,
        like_pattern: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, QueryError> {
        let ids = sqlx::query_scalar::<_, String>(DISTINCT_ITEM_IDS)
            .bind(like_pattern)
            .bind(cutoff.timestamp())
            .fetch_all(&self.pool)
            .await?;
        debug!(
            pattern = like_pattern,
            matched = ids.len(),
            "expanded item pattern"
        );
        Ok(ids)
    }

    async fn select_one(
        &self,
        location: Location,
        item_id: &str,
        auction_type: AuctionType,
        cutoff: DateTime<Utc>,
        order: OrderSpec,
    ) -> Result<Option<OrderObservation>, QueryError> {
        let rows = sqlx::query_as::<_, MarketOrderRow>(SELECT_LATEST_MINUTE)
            .bind(location.id())
            .bind(item_id)
            .bind(auction_type.as_str())
            .bind(cutoff.timestamp())
            .bind(location.id())
            .bind(item_id)
            .bind(auction_type.as_str())
            .bind(cutoff.timestamp())
            .fetch_all(&self.pool)
            .await?;
        let candidates = rows
            .into_iter()
            .map(OrderObservation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // `min_by` keeps the first of equal elements, i.e. the lowest `id`.
        let picked = candidates
            .into_iter()
            .min_by(|a, b| extremal_cmp(a, b, order.direction));
        Ok(picked)
    }

    async fn market_stats(
        &self,
        item_id: &str,
        location: Location,
    ) -> Result<Vec<MarketStatsRow>, QueryError> {
        let rows = sqlx::query_as::<_, MarketStatsRow>(MARKET_STATS)
            .bind(item_id)
            .bind(location.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn gold_prices(&self) -> Result<Vec<GoldPriceRow>, QueryError> {
        let rows = sqlx::query_as::<_, GoldPriceRow>(GOLD_PRICES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), QueryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
