use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use tracing::debug;

use crate::catalog::{locations, Location};
use crate::db::PriceStore;
use crate::stats::items::resolve_items;
use crate::stats::selector::select_extreme;
use crate::types::{AuctionType, Direction, PriceExtremeResult};

/// Freshness cutoff for a request, truncated to whole seconds.
///
/// A parseable override can only shrink the window. Anything unparseable is
/// ignored and the server default applies.
///
/// Ages reaching past the representable range clamp to the earliest instant
/// (everything qualifies); negative ones past it clamp to the latest.
pub fn effective_cutoff(
    now: DateTime<Utc>,
    default_age_secs: i64,
    age_override: Option<&str>,
) -> DateTime<Utc> {
    let age = age_override
        .and_then(|raw| raw.parse::<i64>().ok())
        .map_or(default_age_secs, |secs| secs.min(default_age_secs));
    let out_of_range = if age > 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };
    DateTime::from_timestamp(now.timestamp().saturating_sub(age), 0).unwrap_or(out_of_range)
}

/// Computes price extremes per (item, location) pair.
///
/// Stateless across requests; the store is the only shared resource.
#[derive(Clone)]
pub struct PriceAggregator {
    store: Arc<dyn PriceStore>,
    default_age_secs: i64,
    concurrency: usize,
}

impl PriceAggregator {
    pub fn new(store: Arc<dyn PriceStore>, default_age_secs: i64, concurrency: usize) -> Self {
        Self {
            store,
            default_age_secs,
            concurrency: concurrency.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn PriceStore> {
        &self.store
    }

    pub async fn get_price_stats(
        &self,
        items_csv: &str,
        locations_csv: &str,
        age_override: Option<&str>,
    ) -> Vec<PriceExtremeResult> {
        self.get_price_stats_at(Utc::now(), items_csv, locations_csv, age_override)
            .await
    }

    /// Results are item-major, location-minor. Pairs with no data on any
    /// side are omitted; duplicates in either input give duplicate rows.
    pub async fn get_price_stats_at(
        &self,
        now: DateTime<Utc>,
        items_csv: &str,
        locations_csv: &str,
        age_override: Option<&str>,
    ) -> Vec<PriceExtremeResult> {
        let cutoff = effective_cutoff(now, self.default_age_secs, age_override);
        let locations = locations::resolve_csv(locations_csv);
        let items = resolve_items(self.store.as_ref(), items_csv, cutoff).await;

        let pairs: Vec<(String, Location)> = items
            .iter()
            .flat_map(|item| locations.iter().map(move |&l| (item.clone(), l)))
            .collect();
        let pair_count = pairs.len();

        // `buffered` yields in input order, so concurrency never reorders rows.
        let results: Vec<PriceExtremeResult> = stream::iter(pairs)
            .map(|(item_id, location)| async move {
                self.select_pair(&item_id, location, cutoff).await
            })
            .buffered(self.concurrency)
            .filter_map(|row| async move { row })
            .collect()
            .await;

        debug!(
            items = items.len(),
            locations = locations.len(),
            pairs = pair_count,
            rows = results.len(),
            cutoff = %cutoff,
            "price stats aggregated"
        );
        results
    }

    async fn select_pair(
        &self,
        item_id: &str,
        location: Location,
        cutoff: DateTime<Utc>,
    ) -> Option<PriceExtremeResult> {
        let store = self.store.as_ref();
        let pick = |side, direction| {
            select_extreme(store, item_id, location, side, cutoff, direction)
        };
        let (sell_min, sell_max, buy_min, buy_max) = futures_util::join!(
            pick(AuctionType::Offer, Direction::Min),
            pick(AuctionType::Offer, Direction::Max),
            pick(AuctionType::Request, Direction::Min),
            pick(AuctionType::Request, Direction::Max),
        );
        PriceExtremeResult::from_selections(item_id, location, sell_min, sell_max, buy_min, buy_max)
    }
}
