//! In-memory `PriceStore` for exercising the aggregator without SQLite.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::catalog::Location;
use crate::db::models::{GoldPriceRow, MarketStatsRow};
use crate::db::store::{PriceStore, QueryError};
use crate::stats::selector::extremal_cmp;
use crate::types::{AuctionType, OrderObservation, OrderSpec};

#[derive(Default)]
pub struct MemoryStore {
    orders: Mutex<Vec<OrderObservation>>,
    stats: Mutex<Vec<MarketStatsRow>>,
    gold: Mutex<Vec<GoldPriceRow>>,
    /// LIKE patterns whose expansion fails.
    failing_patterns: Mutex<HashSet<String>>,
    /// Items whose extremal selections fail.
    failing_items: Mutex<HashSet<String>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &self,
        item_id: &str,
        location: Location,
        auction_type: AuctionType,
        price: i64,
        updated_at: DateTime<Utc>,
    ) {
        self.orders.lock().unwrap().push(OrderObservation {
            item_id: item_id.to_string(),
            location,
            auction_type,
            price,
            updated_at,
        });
    }

    pub fn offer(&self, item_id: &str, location: Location, price: i64, at: DateTime<Utc>) {
        self.push(item_id, location, AuctionType::Offer, price, at);
    }

    pub fn request(&self, item_id: &str, location: Location, price: i64, at: DateTime<Utc>) {
        self.push(item_id, location, AuctionType::Request, price, at);
    }

    pub fn push_stats(&self, row: MarketStatsRow) {
        self.stats.lock().unwrap().push(row);
    }

    pub fn push_gold(&self, row: GoldPriceRow) {
        self.gold.lock().unwrap().push(row);
    }

    pub fn fail_pattern(&self, like_pattern: &str) {
        let mut failing = self.failing_patterns.lock().unwrap();
        failing.insert(like_pattern.to_string());
    }

    pub fn fail_item(&self, item_id: &str) {
        let mut failing = self.failing_items.lock().unwrap();
        failing.insert(item_id.to_string());
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn distinct_item_ids(
        &self,
        like_pattern: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, QueryError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if fails(&self.failing_patterns, like_pattern) {
            return Err(QueryError::Database(sqlx::Error::PoolClosed));
        }
        let mut ids: Vec<String> = Vec::new();
        for o in self.orders.lock().unwrap().iter() {
            if o.updated_at >= cutoff
                && like_match(like_pattern, &o.item_id)
                && !ids.contains(&o.item_id)
            {
                ids.push(o.item_id.clone());
            }
        }
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
        self.queries.fetch_add(1, Ordering::Relaxed);
        if fails(&self.failing_items, item_id) {
            return Err(QueryError::Database(sqlx::Error::PoolClosed));
        }
        let orders = self.orders.lock().unwrap();
        // `min_by` keeps the first of equal elements: earliest pushed wins ties.
        Ok(orders
            .iter()
            .filter(|o| {
                o.location == location
                    && o.item_id == item_id
                    && o.auction_type == auction_type
                    && o.updated_at >= cutoff
            })
            .min_by(|a, b| extremal_cmp(a, b, order.direction))
            .cloned())
    }

    async fn market_stats(
        &self,
        item_id: &str,
        location: Location,
    ) -> Result<Vec<MarketStatsRow>, QueryError> {
        let mut rows: Vec<MarketStatsRow> = self
            .stats
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.item_id == item_id && r.location == location.id())
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }

    async fn gold_prices(&self) -> Result<Vec<GoldPriceRow>, QueryError> {
        let mut rows = self.gold.lock().unwrap().clone();
        rows.sort_by_key(|r| r.timestamp);
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), QueryError> {
        Ok(())
    }
}

fn fails(keys: &Mutex<HashSet<String>>, key: &str) -> bool {
    keys.lock().unwrap().contains(key)
}

/// SQLite `LIKE`: `%` is any run, `_` is any one char, ASCII case-insensitive.
fn like_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let t: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && p[pi] == '%' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && (p[pi] == '_' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if let Some((bp, bt)) = backtrack {
            pi = bp + 1;
            ti = bt + 1;
            backtrack = Some((bp, bt + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod tests {
    use super::like_match;

    #[test]
    fn like_semantics() {
        assert!(like_match("T4_%", "T4_BAG"));
        assert!(like_match("%BAG", "T4_BAG"));
        assert!(like_match("%", ""));
        assert!(like_match("t4_bag", "T4_BAG"));
        assert!(like_match("T_%", "T8_CAPE"));
        assert!(!like_match("T4_%", "T5_BAG"));
        assert!(!like_match("%CAPE", "T4_BAG"));
        assert!(!like_match("T4", "T4_BAG"));
    }
}
