//! Volatility estimation
//!
//! Relative volatility of recent closes, used to scale per-trade risk

use crate::feed::{closes, Candle};
use crate::indicators::rolling_std;

/// Trait for volatility estimators used by the risk sizer
pub trait VolatilityEstimator: Send + Sync {
    /// Volatility of the window ending at the last candle, if computable
    fn estimate(&self, candles: &[Candle]) -> Option<f64>;
}

/// Rolling standard deviation of closes divided by the last close
#[derive(Debug, Clone)]
pub struct RelativeVolatility {
    window: usize,
}

impl RelativeVolatility {
    /// Create an estimator over `window` closes
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for RelativeVolatility {
    fn default() -> Self {
        Self::new(20)
    }
}

impl VolatilityEstimator for RelativeVolatility {
    fn estimate(&self, candles: &[Candle]) -> Option<f64> {
        if self.window == 0 || candles.len() < self.window {
            return None;
        }

        // Only the last window matters
        let tail = &candles[candles.len() - self.window..];
        let closes = closes(tail);
        let std = *rolling_std(&closes, self.window).last()?;
        let last = *closes.last()?;

        let rel = std / (last + 1e-12);
        rel.is_finite().then_some(rel)
    }
}
