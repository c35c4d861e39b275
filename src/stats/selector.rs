use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::catalog::Location;
use crate::db::PriceStore;
use crate::types::{AuctionType, Direction, OrderObservation, OrderSpec, PricePoint};

/// Minute bucket of a timestamp: seconds are discarded.
#[inline]
pub fn minute_bucket(ts: DateTime<Utc>) -> i64 {
    ts.timestamp().div_euclid(60)
}

/// Extremal ordering. `Less` means `a` is preferred over `b`.
///
/// Primary key: minute bucket, most recent first. Secondary key: price,
/// ascending for `Min` and descending for `Max`. A fresh price therefore
/// beats a more extreme one from an older minute.
pub fn extremal_cmp(a: &OrderObservation, b: &OrderObservation, direction: Direction) -> Ordering {
    let by_minute = minute_bucket(b.updated_at).cmp(&minute_bucket(a.updated_at));
    let by_price = match direction {
        Direction::Min => a.price.cmp(&b.price),
        Direction::Max => b.price.cmp(&a.price),
    };
    by_minute.then(by_price)
}

/// Selects one extreme for (item, location, side) inside the freshness window.
///
/// A store failure is logged and reported as no data.
pub async fn select_extreme(
    store: &dyn PriceStore,
    item_id: &str,
    location: Location,
    auction_type: AuctionType,
    cutoff: DateTime<Utc>,
    direction: Direction,
) -> Option<PricePoint> {
    let order = match direction {
        Direction::Min => OrderSpec::min(),
        Direction::Max => OrderSpec::max(),
    };
    match store
        .select_one(location, item_id, auction_type, cutoff, order)
        .await
    {
        Ok(found) => found.as_ref().map(PricePoint::from),
        Err(e) => {
            warn!(
                item_id,
                location = %location,
                side = %auction_type,
                direction = %direction,
                "extremal selection failed: {e}"
            );
            None
        }
    }
}
