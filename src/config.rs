use crate::error::{AppError, Result};

pub const LISTEN_ADDR: &str = "[::1]:3080";
pub const DB_PATH: &str = "albiondata.db";
pub const ROOT_REDIRECT_URL: &str = "https://www.albion-online-data.com";

/// Observations older than this many seconds are never considered (48h).
/// Clients may narrow the window with `?age=` but never widen it.
pub const DEFAULT_MIN_UPDATED_AT_SECS: i64 = 172_800;

/// Upper bound on (item, location) pairs queried at once per request.
pub const DEFAULT_QUERY_CONCURRENCY: usize = 8;

/// Read connections held by the SQLite pool.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub db_path: String,
    pub db_max_connections: u32,
    /// Server-side freshness window in seconds (MIN_UPDATED_AT_SECS)
    pub min_updated_at_secs: i64,
    /// In-flight pair query sets per request (QUERY_CONCURRENCY)
    pub query_concurrency: usize,
    /// Where `GET /` sends browsers (ROOT_REDIRECT_URL)
    pub root_redirect_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| LISTEN_ADDR.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| DB_PATH.to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DB_MAX_CONNECTIONS.to_string())
                .parse::<u32>()
                .map_err(|_| {
                    AppError::Config("DB_MAX_CONNECTIONS must be a positive integer".to_string())
                })?,
            min_updated_at_secs: match std::env::var("MIN_UPDATED_AT_SECS") {
                Ok(raw) => parse_min_updated_at(&raw)?,
                Err(_) => DEFAULT_MIN_UPDATED_AT_SECS,
            },
            query_concurrency: std::env::var("QUERY_CONCURRENCY")
                .unwrap_or_else(|_| DEFAULT_QUERY_CONCURRENCY.to_string())
                .parse::<usize>()
                .unwrap_or(DEFAULT_QUERY_CONCURRENCY)
                .max(1),
            root_redirect_url: std::env::var("ROOT_REDIRECT_URL")
                .unwrap_or_else(|_| ROOT_REDIRECT_URL.to_string()),
        })
    }
}

/// MIN_UPDATED_AT_SECS: whole seconds, zero or more.
fn parse_min_updated_at(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(secs) if secs >= 0 => Ok(secs),
        _ => Err(AppError::Config(
            "MIN_UPDATED_AT_SECS must be a non-negative number of seconds".to_string(),
        )),
    }
}
