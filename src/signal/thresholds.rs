//! Threshold decision engine
//!
//! Maps the model's P(up) to BUY / SELL / FLAT, optionally gated by a
//! trend filter.

use super::trend::TrendGate;
use super::{Decision, DecisionKind, DecisionReason};
use crate::config::StrategyConfig;
use crate::feed::Candle;

/// Decision thresholds, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// P(up) at or above this is a BUY
    pub buy: f64,
    /// P(up) at or below this is a SELL
    pub sell: f64,
    /// Require trend confirmation before acting
    pub use_ma_filter: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            buy: 0.55,
            sell: 0.45,
            use_ma_filter: true,
        }
    }
}

impl From<&StrategyConfig> for Thresholds {
    fn from(config: &StrategyConfig) -> Self {
        Self {
            buy: config.buy_threshold,
            sell: config.sell_threshold,
            use_ma_filter: config.use_ma_filter,
        }
    }
}

/// Turns probabilities into decisions
pub struct ThresholdDecisionEngine {
    thresholds: Thresholds,
}

impl ThresholdDecisionEngine {
    /// Create an engine with the given thresholds
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Engine thresholds
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Raw threshold outcome, ignoring the trend filter
    ///
    /// The buy rule is checked first, so with overlapping thresholds a
    /// probability satisfying both resolves to BUY.
    pub fn classify(&self, probability: f64) -> (DecisionKind, DecisionReason) {
        if probability.is_nan() {
            (DecisionKind::Flat, DecisionReason::InvalidProbability)
        } else if probability >= self.thresholds.buy {
            (DecisionKind::Buy, DecisionReason::AboveBuyThreshold)
        } else if probability <= self.thresholds.sell {
            (DecisionKind::Sell, DecisionReason::BelowSellThreshold)
        } else {
            (DecisionKind::Flat, DecisionReason::WithinBand)
        }
    }

    /// Full decision: threshold outcome AND trend confirmation when enabled
    pub fn decide(&self, probability: f64, gate: &dyn TrendGate, candles: &[Candle]) -> Decision {
        let (kind, reason) = self.classify(probability);
        if !kind.is_actionable() {
            return Decision::flat(probability, reason);
        }

        if self.thresholds.use_ma_filter && !gate.confirms(candles, kind) {
            tracing::debug!(%kind, probability, "Trend filter rejected decision");
            return Decision::flat(probability, DecisionReason::TrendNotConfirmed);
        }

        Decision::new(kind, probability, reason)
    }
}
