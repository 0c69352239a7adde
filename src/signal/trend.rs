//! Trend confirmation gates
//!
//! When the moving-average filter is enabled, a threshold decision must be
//! confirmed by the recent trend before it is acted on.

use super::DecisionKind;
use crate::feed::{closes, Candle};
use crate::indicators::ema;

const FAST_PERIOD: usize = 4;
const SLOW_PERIOD: usize = 8;

/// Direction implied by the trend regime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// Trait for trend confirmation implementations
pub trait TrendGate: Send + Sync {
    /// Whether the recent trend agrees with `kind`
    fn confirms(&self, candles: &[Candle], kind: DecisionKind) -> bool;
}

/// Fast/slow EMA turn patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaRegime {
    /// Fast below slow, gap was widening and is now closing
    LowBottom,
    /// Fast above slow, gap was widening and is now closing
    HighPeak,
    /// Fast still below slow but the gap shrank over three bars
    PriceDownGoingUp,
    /// Fast still above slow but the gap shrank over three bars
    PriceUpGoingDown,
    /// No pattern
    Neutral,
}

impl EmaRegime {
    /// Trade direction this regime supports
    pub fn direction(&self) -> TrendDirection {
        match self {
            EmaRegime::LowBottom | EmaRegime::PriceDownGoingUp => TrendDirection::Up,
            EmaRegime::HighPeak | EmaRegime::PriceUpGoingDown => TrendDirection::Down,
            EmaRegime::Neutral => TrendDirection::Neutral,
        }
    }
}

/// EMA(4) vs EMA(8) regime filter
#[derive(Debug, Clone, Copy, Default)]
pub struct EmaRegimeGate;

impl EmaRegimeGate {
    /// Create a new gate
    pub fn new() -> Self {
        Self
    }

    /// Classify the regime at the last candle
    ///
    /// Compares the fast/slow gap now against two and three bars back.
    pub fn regime(&self, candles: &[Candle]) -> EmaRegime {
        if candles.len() < 4 {
            return EmaRegime::Neutral;
        }

        let closes = closes(candles);
        let fast = ema(&closes, FAST_PERIOD);
        let slow = ema(&closes, SLOW_PERIOD);
        let i = closes.len() - 1;

        let (f0, s0) = (fast[i], slow[i]);
        let (f2, s2) = (fast[i - 2], slow[i - 2]);
        let (f3, s3) = (fast[i - 3], slow[i - 3]);
        if [f0, s0, f2, s2, f3, s3].iter().any(|v| !v.is_finite()) {
            return EmaRegime::Neutral;
        }

        let low_bottom = f3 < s3 && (f2 - s2) > (f3 - s3) && (f0 - s0) < (f2 - s2) && f0 < s0;
        let high_peak = s3 < f3 && (s2 - f2) > (s3 - f3) && (s0 - f0) < (s2 - f2) && s0 < f0;
        let down_going_up = s0 > f0 && (s0 - f0) < (s3 - f3) && s3 > f3;
        let up_going_down = f0 > s0 && (f0 - s0) < (f3 - s3) && f3 > s3;

        if low_bottom {
            EmaRegime::LowBottom
        } else if high_peak {
            EmaRegime::HighPeak
        } else if down_going_up {
            EmaRegime::PriceDownGoingUp
        } else if up_going_down {
            EmaRegime::PriceUpGoingDown
        } else {
            EmaRegime::Neutral
        }
    }
}

impl TrendGate for EmaRegimeGate {
    fn confirms(&self, candles: &[Candle], kind: DecisionKind) -> bool {
        let regime = self.regime(candles);
        tracing::debug!(?regime, %kind, "EMA regime");
        match kind {
            DecisionKind::Buy => regime.direction() == TrendDirection::Up,
            DecisionKind::Sell => regime.direction() == TrendDirection::Down,
            DecisionKind::Flat => true,
        }
    }
}
