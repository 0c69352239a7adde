//! Volatility-adjusted position sizing
//!
//! Scales the configured risk-per-trade percentage by a tiered factor:
//! smaller in turbulent markets, slightly larger in calm ones.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::volatility::{RelativeVolatility, VolatilityEstimator};
use crate::config::RiskConfig;
use crate::feed::Candle;
use crate::signal::Decision;

/// Below this many candles the factor stays neutral
pub const MIN_SIZING_CANDLES: usize = 40;

/// Relative-volatility bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityTier {
    /// Relative volatility above 2%
    High,
    /// Above 1%
    Elevated,
    /// Between 0.4% and 1%, or unknown
    Normal,
    /// Below 0.4%
    Calm,
}

impl VolatilityTier {
    /// Bucket a relative volatility reading
    pub fn from_relative_vol(rel: f64) -> Self {
        if rel > 0.02 {
            VolatilityTier::High
        } else if rel > 0.01 {
            VolatilityTier::Elevated
        } else if rel < 0.004 {
            VolatilityTier::Calm
        } else {
            VolatilityTier::Normal
        }
    }

    /// Multiplier on base risk
    pub fn multiplier(&self) -> f64 {
        match self {
            VolatilityTier::High => 0.6,
            VolatilityTier::Elevated => 0.8,
            VolatilityTier::Normal => 1.0,
            VolatilityTier::Calm => 1.2,
        }
    }

    /// Same multiplier as an exact decimal
    pub fn factor(&self) -> Decimal {
        match self {
            VolatilityTier::High => dec!(0.6),
            VolatilityTier::Elevated => dec!(0.8),
            VolatilityTier::Normal => dec!(1.0),
            VolatilityTier::Calm => dec!(1.2),
        }
    }
}

/// Sizing result for one decision
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSize {
    /// Multiplier applied to base risk
    pub risk_factor: f64,
    /// Effective percentage of equity risked
    pub risk_pct: Decimal,
    /// Order value in quote currency; zero for FLAT
    pub notional: Decimal,
    /// Order quantity in base units at the last close; zero for FLAT
    pub quantity: Decimal,
}

/// Computes the risk factor and order size
#[derive(Debug, Clone)]
pub struct RiskSizer<V: VolatilityEstimator = RelativeVolatility> {
    estimator: V,
    /// Percent of equity risked per trade before adjustment (0.25 = 0.25%)
    pub base_risk_pct: Decimal,
    /// Apply the volatility factor
    pub vol_adjust: bool,
    /// Minimum order value
    pub order_min_usd: Decimal,
}

impl RiskSizer<RelativeVolatility> {
    /// Create a sizer using 20-candle relative volatility
    pub fn new(base_risk_pct: Decimal, vol_adjust: bool) -> Self {
        Self {
            estimator: RelativeVolatility::default(),
            base_risk_pct,
            vol_adjust,
            order_min_usd: dec!(5),
        }
    }

    /// Create from RiskConfig
    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.risk_per_trade_pct, config.vol_risk_adjust)
            .with_min_order(config.order_min_usd)
    }
}

impl<V: VolatilityEstimator> RiskSizer<V> {
    /// Create a sizer with a custom volatility estimator
    pub fn with_estimator(estimator: V, base_risk_pct: Decimal, vol_adjust: bool) -> Self {
        Self {
            estimator,
            base_risk_pct,
            vol_adjust,
            order_min_usd: dec!(5),
        }
    }

    /// Set minimum order value
    pub fn with_min_order(mut self, order_min_usd: Decimal) -> Self {
        self.order_min_usd = order_min_usd;
        self
    }

    /// Volatility tier for the window ending at the last candle
    pub fn tier(&self, candles: &[Candle]) -> VolatilityTier {
        if !self.vol_adjust || candles.len() < MIN_SIZING_CANDLES {
            return VolatilityTier::Normal;
        }
        match self.estimator.estimate(candles) {
            Some(rel) => VolatilityTier::from_relative_vol(rel),
            None => VolatilityTier::Normal,
        }
    }

    /// Multiplier on base risk; always positive
    pub fn risk_factor(&self, candles: &[Candle]) -> f64 {
        self.tier(candles).multiplier()
    }

    /// Size an order for `decision` against `equity`
    pub fn size(&self, decision: &Decision, candles: &[Candle], equity: Decimal) -> PositionSize {
        let tier = self.tier(candles);
        let risk_factor = tier.multiplier();
        let risk_pct = self
            .base_risk_pct
            .checked_mul(tier.factor())
            .unwrap_or(Decimal::MAX);

        if !decision.kind.is_actionable() {
            return PositionSize {
                risk_factor,
                risk_pct,
                notional: Decimal::ZERO,
                quantity: Decimal::ZERO,
            };
        }

        let notional = match equity
            .checked_mul(risk_pct)
            .and_then(|v| v.checked_div(dec!(100)))
        {
            Some(notional) => notional.max(self.order_min_usd),
            None => {
                tracing::warn!(
                    %equity,
                    %risk_pct,
                    "Order notional overflows, using the minimum order"
                );
                self.order_min_usd
            }
        };
        let price = candles
            .last()
            .and_then(|c| Decimal::try_from(c.close).ok())
            .unwrap_or(Decimal::ZERO);
        let quantity = if price > Decimal::ZERO {
            notional.checked_div(price).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        PositionSize {
            risk_factor,
            risk_pct,
            notional,
            quantity,
        }
    }
}
