//! Risk module
//!
//! Volatility-aware risk factor and order sizing

mod sizing;
mod volatility;

pub use sizing::{PositionSize, RiskSizer, VolatilityTier, MIN_SIZING_CANDLES};
pub use volatility::{RelativeVolatility, VolatilityEstimator};
