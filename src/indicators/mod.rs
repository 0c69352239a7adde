//! Technical indicators
//!
//! Series helpers used by the feature extractors, the trend gate and the
//! volatility estimator. Every output is aligned to its input:
//! `out[i]` describes the window ending at `closes[i]`.

mod moving;
mod oscillators;
mod volume;

pub use moving::{ema, macd, rolling_std, sma, Macd};
pub use oscillators::{rsi, zscore};
pub use volume::{atr, obv};
