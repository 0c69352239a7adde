//! Candle feed module
//!
//! Supplies the ordered, append-only candle history consumed by the
//! feature extractor and the walk-forward scheduler

mod csv_feed;
mod types;

pub use csv_feed::CsvCandleFeed;
pub use types::{closes, Candle};

use async_trait::async_trait;
use thiserror::Error;

/// Candle feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unparseable timestamp: {0}")]
    BadTimestamp(String),
    #[error("Feed returned no candles")]
    Empty,
}

/// Trait for candle feed implementations
#[async_trait]
pub trait CandleFeed: Send + Sync {
    /// Fetch up to `limit` of the most recent candles, oldest first
    async fn recent_candles(&self, limit: usize) -> Result<Vec<Candle>, FeedError>;
}
