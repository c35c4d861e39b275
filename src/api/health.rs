//! Shared health state for the /health endpoint.
//! Updated by the price handlers, read by the health handler.

use std::sync::atomic::{AtomicU64, Ordering};

/// Request counters. Updated by handlers, read by API.
#[derive(Default)]
pub struct HealthState {
    /// Price aggregations served (JSON and HTML).
    pub price_requests: AtomicU64,
    /// Chart and gold history reads that failed at the store.
    pub history_errors: AtomicU64,
    /// Unix seconds of the last price aggregation (0 = none).
    pub last_price_request_at: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_price_request(&self, at_secs: u64) {
        self.price_requests.fetch_add(1, Ordering::Relaxed);
        self.last_price_request_at.store(at_secs, Ordering::Relaxed);
    }

    pub fn inc_history_errors(&self) {
        self.history_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn price_requests(&self) -> u64 {
        self.price_requests.load(Ordering::Relaxed)
    }

    pub fn history_errors(&self) -> u64 {
        self.history_errors.load(Ordering::Relaxed)
    }

    pub fn last_price_request_at(&self) -> u64 {
        self.last_price_request_at.load(Ordering::Relaxed)
    }
}
