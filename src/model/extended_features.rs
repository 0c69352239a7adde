//! Extended feature extraction
//!
//! Eight features per candle for the extended head: the four baseline
//! features plus ATR(14) relative to the close, the MACD(12, 26, 9)
//! histogram, on-balance volume scaled by its largest magnitude in the
//! window, and the 20-close standard deviation relative to the close.

use crate::feed::{closes, Candle};
use crate::indicators::{atr, macd, obv, rolling_std, rsi, zscore};

/// Number of extended features per sample
pub const EXTENDED_FEATURE_COUNT: usize = 8;

/// Shorter windows produce no extended rows at all
pub const MIN_EXTENDED_CANDLES: usize = 60;

/// First candle index that yields an extended row
pub const EXTENDED_START_INDEX: usize = 26;

/// Added to return and volatility denominators
const DENOMINATOR_EPSILON: f64 = 1e-12;

/// Extended feature row in model order
pub type ExtendedRow = [f64; EXTENDED_FEATURE_COUNT];

/// Precomputed indicator series for one candle window
pub struct ExtendedFeatureExtractor<'a> {
    candles: &'a [Candle],
    rsi: Vec<f64>,
    zscore: Vec<f64>,
    atr: Vec<f64>,
    histogram: Vec<f64>,
    obv: Vec<f64>,
    std20: Vec<f64>,
}

impl<'a> ExtendedFeatureExtractor<'a> {
    pub fn new(candles: &'a [Candle]) -> Self {
        let closes = closes(candles);
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let raw_obv = obv(&closes, &volumes);
        let scale = raw_obv.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));

        Self {
            candles,
            rsi: rsi(&closes, 14),
            zscore: zscore(&closes, 20),
            atr: atr(&highs, &lows, &closes, 14),
            histogram: macd(&closes, 12, 26, 9).histogram,
            obv: raw_obv.iter().map(|v| v / scale).collect(),
            std20: rolling_std(&closes, 20),
        }
    }

    /// Row for index `i`, or None for short windows and out-of-range indices
    pub fn row_at(&self, i: usize) -> Option<ExtendedRow> {
        if self.candles.len() < MIN_EXTENDED_CANDLES
            || i < EXTENDED_START_INDEX
            || i >= self.candles.len()
        {
            return None;
        }

        let close = self.candles[i].close;
        let prev1 = self.candles[i - 1].close;
        let prev5 = self.candles[i - 5].close;
        let atr_pct = if close > 0.0 { self.atr[i] / close } else { 0.0 };

        Some([
            (close - prev1) / (prev1 + DENOMINATOR_EPSILON),
            (close - prev5) / (prev5 + DENOMINATOR_EPSILON),
            self.rsi[i] / 100.0,
            self.zscore[i],
            atr_pct,
            self.histogram[i],
            self.obv[i],
            self.std20[i] / (close + DENOMINATOR_EPSILON),
        ])
    }

    /// Row for the most recent candle
    pub fn latest(&self) -> Option<ExtendedRow> {
        self.row_at(self.candles.len().checked_sub(1)?)
    }

    /// Labelled rows for every index from 26 up to the second-to-last candle
    ///
    /// The label is 1 iff the next close is higher. Rows with a non-finite
    /// feature are dropped.
    pub fn training_rows(&self) -> (Vec<ExtendedRow>, Vec<f64>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for i in EXTENDED_START_INDEX..self.candles.len().saturating_sub(1) {
            let Some(row) = self.row_at(i) else {
                continue;
            };
            if !row.iter().all(|v| v.is_finite()) {
                continue;
            }
            let up = self.candles[i + 1].close > self.candles[i].close;
            rows.push(row);
            labels.push(if up { 1.0 } else { 0.0 });
        }

        (rows, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn market(n: usize) -> Vec<Candle> {
        let start = Utc::now();
        (0..n)
            .map(|i| {
                let t = i as f64;
                let close = 100.0 + (t * 0.37).sin() * 1.5 + t * 0.02;
                Candle::new(
                    start + Duration::minutes(i as i64),
                    close,
                    close + 0.4,
                    close - 0.4,
                    close,
                    10.0 + (t * 0.5).cos().abs() * 5.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_short_window_has_no_rows() {
        let candles = market(59);
        let extractor = ExtendedFeatureExtractor::new(&candles);
        assert!(extractor.latest().is_none());
        let (rows, labels) = extractor.training_rows();
        assert!(rows.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_row_bounds() {
        let candles = market(80);
        let extractor = ExtendedFeatureExtractor::new(&candles);
        assert!(extractor.row_at(25).is_none());
        assert!(extractor.row_at(26).is_some());
        assert!(extractor.row_at(80).is_none());
        assert_eq!(extractor.latest(), extractor.row_at(79));
    }

    #[test]
    fn test_training_rows_exclude_last_candle() {
        let candles = market(100);
        let (rows, labels) = ExtendedFeatureExtractor::new(&candles).training_rows();
        // Indices 26..=98
        assert_eq!(rows.len(), 73);
        assert_eq!(labels.len(), 73);
        assert!(labels.iter().all(|y| *y == 0.0 || *y == 1.0));
    }

    #[test]
    fn test_row_values() {
        let candles = market(70);
        let extractor = ExtendedFeatureExtractor::new(&candles);
        let row = extractor.row_at(40).unwrap();
        let close = candles[40].close;

        let expected_ret1 = (close - candles[39].close) / (candles[39].close + 1e-12);
        assert!((row[0] - expected_ret1).abs() < 1e-15);
        assert!((0.0..=1.0).contains(&row[2]));
        // Candle span is 0.8 so ATR stays near it
        assert!(row[4] > 0.0 && row[4] < 0.02);
        assert!((-1.0..=1.0).contains(&row[6]));
        assert!(row[7] > 0.0);
    }

    #[test]
    fn test_zero_volume_obv_is_zero() {
        let start = Utc::now();
        let candles: Vec<Candle> = (0..60)
            .map(|i| Candle::from_close(start + Duration::minutes(i), 100.0 + i as f64))
            .collect();
        let row = ExtendedFeatureExtractor::new(&candles).latest().unwrap();
        assert_eq!(row[6], 0.0);
        // Flat candles one apart: ATR converges towards the 1.0 gap
        let atr = row[4] * candles[59].close;
        assert!(atr > 0.99 && atr <= 1.0);
    }

    #[test]
    fn test_non_finite_rows_dropped() {
        let mut candles = market(80);
        candles[50].close = f64::NAN;
        let (rows, labels) = ExtendedFeatureExtractor::new(&candles).training_rows();
        assert_eq!(rows.len(), labels.len());
        assert!(rows.iter().all(|r| r.iter().all(|v| v.is_finite())));
        assert!(rows.len() < 53);
    }
}
