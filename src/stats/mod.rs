pub mod aggregator;
pub mod items;
pub mod selector;

pub use aggregator::PriceAggregator;
