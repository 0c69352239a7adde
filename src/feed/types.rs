//! Candle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV interval sample
///
/// Candle sequences are ordered by `timestamp` and append-only: once a
/// candle has closed it is never rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval open time
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Create a new candle
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Flat candle where every price equals `close`
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }
}

/// Extract the close series from a candle window
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
