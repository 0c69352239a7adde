//! Signal generation module
//!
//! Threshold decisions over the model probability and the trend filter
//! that can veto them

mod thresholds;
mod trend;
mod types;

pub use thresholds::{ThresholdDecisionEngine, Thresholds};
pub use trend::{EmaRegime, EmaRegimeGate, TrendDirection, TrendGate};
pub use types::{Decision, DecisionKind, DecisionReason};
