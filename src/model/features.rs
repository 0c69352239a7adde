//! Feature extraction
//!
//! Turns a candle window into the four-element vector the signal model
//! consumes: one-bar return, five-bar return, RSI(14)/100 and ZScore(20).

use crate::feed::{closes, Candle};
use crate::indicators::{rsi, zscore};
use serde::{Deserialize, Serialize};

/// Number of features per sample
pub const FEATURE_COUNT: usize = 4;

/// First candle index with a complete look-back for every feature
pub const MIN_FEATURE_INDEX: usize = 21;

const RSI_PERIOD: usize = 14;
const ZSCORE_PERIOD: usize = 20;

/// Features derived for one candle index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// (close[i] - close[i-1]) / close[i-1]
    pub ret1: f64,
    /// (close[i] - close[i-5]) / close[i-5]
    pub ret5: f64,
    /// RSI(14) scaled to [0, 1]
    pub rsi_norm: f64,
    /// ZScore(20) of the close
    pub zscore: f64,
}

impl FeatureVector {
    /// Features in model order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.ret1, self.ret5, self.rsi_norm, self.zscore]
    }

    /// False when any feature is NaN or infinite (e.g. a zero close in the
    /// return denominators). Such vectors must not reach training or
    /// prediction.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Computes features over a fixed candle window
///
/// Indicator series are computed once at construction, so looking up many
/// indices (dataset building) stays linear in the window length.
pub struct FeatureExtractor<'a> {
    candles: &'a [Candle],
    rsi: Vec<f64>,
    zscore: Vec<f64>,
}

impl<'a> FeatureExtractor<'a> {
    /// Precompute indicator series for `candles`
    pub fn new(candles: &'a [Candle]) -> Self {
        let closes = closes(candles);
        Self {
            candles,
            rsi: rsi(&closes, RSI_PERIOD),
            zscore: zscore(&closes, ZSCORE_PERIOD),
        }
    }

    /// Number of candles in the window
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Features for index `i`, or None if `i` lacks look-back or is out of range
    pub fn features_at(&self, i: usize) -> Option<FeatureVector> {
        if i < MIN_FEATURE_INDEX || i >= self.candles.len() {
            return None;
        }

        let close = self.candles[i].close;
        let prev1 = self.candles[i - 1].close;
        let prev5 = self.candles[i - 5].close;

        Some(FeatureVector {
            ret1: (close - prev1) / prev1,
            ret5: (close - prev5) / prev5,
            rsi_norm: self.rsi[i] / 100.0,
            zscore: self.zscore[i],
        })
    }

    /// Features for the most recent candle
    pub fn latest(&self) -> Option<FeatureVector> {
        self.features_at(self.candles.len().checked_sub(1)?)
    }
}

/// Features for a single index of `candles`
pub fn compute_features(candles: &[Candle], i: usize) -> Option<FeatureVector> {
    FeatureExtractor::new(candles).features_at(i)
}
