pub mod models;
pub mod sqlite;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use sqlite::SqliteStore;
pub use store::{PriceStore, QueryError};
