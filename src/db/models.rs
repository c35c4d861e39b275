//! Row types for the tables written by the ingest pipeline (see migrations/).
//! Timestamps are stored as unix seconds.

use chrono::{DateTime, Utc};

use crate::catalog::Location;
use crate::db::store::QueryError;
use crate::types::{AuctionType, OrderObservation};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketOrderRow {
    pub item_id: String,
    pub location: i64,
    pub auction_type: String,
    pub price: i64,
    pub updated_at: i64,
}

impl TryFrom<MarketOrderRow> for OrderObservation {
    type Error = QueryError;

    fn try_from(row: MarketOrderRow) -> Result<Self, Self::Error> {
        let location = Location::from_id(row.location)
            .ok_or_else(|| QueryError::Decode(format!("unknown location id {}", row.location)))?;
        let auction_type = AuctionType::parse(&row.auction_type)
            .ok_or_else(|| QueryError::Decode(format!("unknown side {:?}", row.auction_type)))?;
        let updated_at = from_unix(row.updated_at)?;
        Ok(OrderObservation {
            item_id: row.item_id,
            location,
            auction_type,
            price: row.price,
            updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MarketStatsRow {
    pub item_id: String,
    pub location: i64,
    pub price_min: i64,
    pub price_max: i64,
    pub price_avg: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GoldPriceRow {
    pub price: i64,
    pub timestamp: i64,
}

pub fn from_unix(secs: i64) -> Result<DateTime<Utc>, QueryError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| QueryError::Decode(format!("timestamp out of range: {secs}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location: i64, auction_type: &str) -> MarketOrderRow {
        MarketOrderRow {
            item_id: "T4_BAG".to_string(),
            location,
            auction_type: auction_type.to_string(),
            price: 40,
            updated_at: 1_709_294_445,
        }
    }

    #[test]
    fn decodes_known_location_and_side() {
        let obs = OrderObservation::try_from(row(3005, "offer")).unwrap();
        assert_eq!(obs.location, Location::Caerleon);
        assert_eq!(obs.auction_type, AuctionType::Offer);
        assert_eq!(obs.updated_at.timestamp(), 1_709_294_445);
    }

    #[test]
    fn unknown_location_is_a_decode_error() {
        let err = OrderObservation::try_from(row(1, "offer")).unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)), "got {err}");
    }

    #[test]
    fn unknown_side_is_a_decode_error() {
        let err = OrderObservation::try_from(row(3005, "bid")).unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)), "got {err}");
    }
}
