//! CSV candle feed
//!
//! Reads OHLCV rows from a CSV file with a header row. Timestamps may be
//! RFC3339 strings, unix seconds or unix milliseconds.

use super::{Candle, CandleFeed, FeedError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// Values above this are treated as unix milliseconds
const MILLIS_CUTOFF: i64 = 100_000_000_000;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "time", alias = "ts", alias = "start")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

/// Candle feed backed by a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvCandleFeed {
    path: PathBuf,
}

impl CsvCandleFeed {
    /// Create a feed reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Parse CSV content into candles sorted by timestamp
    pub fn parse(content: &str) -> Result<Vec<Candle>, FeedError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut candles = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let timestamp = parse_timestamp(&row.timestamp)?;
            candles.push(Candle::new(
                timestamp, row.open, row.high, row.low, row.close, row.volume,
            ));
        }

        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FeedError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let secs: i64 = raw
        .parse()
        .map_err(|_| FeedError::BadTimestamp(raw.to_string()))?;
    let parsed = if secs > MILLIS_CUTOFF {
        Utc.timestamp_millis_opt(secs).single()
    } else {
        Utc.timestamp_opt(secs, 0).single()
    };
    parsed.ok_or_else(|| FeedError::BadTimestamp(raw.to_string()))
}

#[async_trait]
impl CandleFeed for CsvCandleFeed {
    async fn recent_candles(&self, limit: usize) -> Result<Vec<Candle>, FeedError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut candles = Self::parse(&content)?;
        if candles.is_empty() {
            return Err(FeedError::Empty);
        }

        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }
        tracing::debug!(path = ?self.path, count = candles.len(), "Loaded candles");
        Ok(candles)
    }
}
