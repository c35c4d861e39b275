use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Location;

// ---------------------------------------------------------------------------
// Order observations
// ---------------------------------------------------------------------------

/// Market side of an order observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionType {
    /// Sell order.
    Offer,
    /// Buy order.
    Request,
}

impl AuctionType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuctionType::Offer => "offer",
            AuctionType::Request => "request",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offer" => Some(AuctionType::Offer),
            "request" => Some(AuctionType::Request),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded snapshot of a market order. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderObservation {
    pub item_id: String,
    pub location: Location,
    pub auction_type: AuctionType,
    pub price: i64,
    /// Second resolution.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Extremal selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Min,
    Max,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Min => write!(f, "min"),
            Direction::Max => write!(f, "max"),
        }
    }
}

/// Ordering handed to the store: most recent minute bucket first, then
/// price ascending (`Min`) or descending (`Max`) inside the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub direction: Direction,
}

impl OrderSpec {
    pub fn min() -> Self {
        Self {
            direction: Direction::Min,
        }
    }

    pub fn max() -> Self {
        Self {
            direction: Direction::Max,
        }
    }
}

/// A selected extreme: the price and when it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub price: i64,
    pub at: DateTime<Utc>,
}

impl From<&OrderObservation> for PricePoint {
    fn from(o: &OrderObservation) -> Self {
        Self {
            price: o.price,
            at: o.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Price statistics result
// ---------------------------------------------------------------------------

/// Extremes for one (item, location) pair. Absent fields serialize as `null`
/// so that "no data" is never mistaken for a price of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceExtremeResult {
    pub item_id: String,
    #[serde(rename = "city")]
    pub location: Location,
    pub sell_price_min: Option<i64>,
    pub sell_price_min_date: Option<DateTime<Utc>>,
    pub sell_price_max: Option<i64>,
    pub sell_price_max_date: Option<DateTime<Utc>>,
    pub buy_price_min: Option<i64>,
    pub buy_price_min_date: Option<DateTime<Utc>>,
    pub buy_price_max: Option<i64>,
    pub buy_price_max_date: Option<DateTime<Utc>>,
}

impl PriceExtremeResult {
    /// Builds a row from the four selections, or `None` when all are absent.
    pub fn from_selections(
        item_id: &str,
        location: Location,
        sell_min: Option<PricePoint>,
        sell_max: Option<PricePoint>,
        buy_min: Option<PricePoint>,
        buy_max: Option<PricePoint>,
    ) -> Option<Self> {
        if sell_min.is_none() && sell_max.is_none() && buy_min.is_none() && buy_max.is_none() {
            return None;
        }
        Some(Self {
            item_id: item_id.to_string(),
            location,
            sell_price_min: sell_min.map(|p| p.price),
            sell_price_min_date: sell_min.map(|p| p.at),
            sell_price_max: sell_max.map(|p| p.price),
            sell_price_max_date: sell_max.map(|p| p.at),
            buy_price_min: buy_min.map(|p| p.price),
            buy_price_min_date: buy_min.map(|p| p.at),
            buy_price_max: buy_max.map(|p| p.price),
            buy_price_max_date: buy_max.map(|p| p.at),
        })
    }
}

// ---------------------------------------------------------------------------
// History endpoints
// ---------------------------------------------------------------------------

/// Parallel arrays as consumed by the charting frontend. Timestamps are
/// epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub timestamps: Vec<i64>,
    pub prices_min: Vec<i64>,
    pub prices_max: Vec<i64>,
    pub prices_avg: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartResponse {
    pub location: Location,
    pub data: ChartSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoldSeries {
    pub timestamps: Vec<i64>,
    pub prices: Vec<i64>,
}
