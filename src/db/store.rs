use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::Location;
use crate::db::models::{GoldPriceRow, MarketStatsRow};
use crate::types::{AuctionType, OrderObservation, OrderSpec};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("undecodable row: {0}")]
    Decode(String),
}

/// Read access to the market tables. The price aggregator only ever goes
/// through this trait, so an in-memory store can stand in for SQLite.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Distinct item IDs matching a SQL `LIKE` pattern with at least one
    /// observation at or after `cutoff`.
    async fn distinct_item_ids(
        &self,
        like_pattern: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, QueryError>;

    /// First observation for (location, item, side) at or after `cutoff`
    /// under `order`. `None` when nothing qualifies.
    async fn select_one(
        &self,
        location: Location,
        item_id: &str,
        auction_type: AuctionType,
        cutoff: DateTime<Utc>,
        order: OrderSpec,
    ) -> Result<Option<OrderObservation>, QueryError>;

    /// Pre-computed history buckets for one item at one location, oldest first.
    async fn market_stats(
        &self,
        item_id: &str,
        location: Location,
    ) -> Result<Vec<MarketStatsRow>, QueryError>;

    /// Full gold price series, oldest first.
    async fn gold_prices(&self) -> Result<Vec<GoldPriceRow>, QueryError>;

    async fn ping(&self) -> Result<(), QueryError>;
}
