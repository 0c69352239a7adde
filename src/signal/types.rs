//! Decision types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trade action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionKind {
    Buy,
    Sell,
    Flat,
}

impl DecisionKind {
    /// Upper-case name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Buy => "BUY",
            DecisionKind::Sell => "SELL",
            DecisionKind::Flat => "FLAT",
        }
    }

    /// Lower-case label used for metric series
    pub fn metric_label(&self) -> &'static str {
        match self {
            DecisionKind::Buy => "buy",
            DecisionKind::Sell => "sell",
            DecisionKind::Flat => "flat",
        }
    }

    /// Whether this action opens an order
    pub fn is_actionable(&self) -> bool {
        !matches!(self, DecisionKind::Flat)
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a decision came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionReason {
    /// Probability at or above the buy threshold
    AboveBuyThreshold,
    /// Probability at or below the sell threshold
    BelowSellThreshold,
    /// Probability between the thresholds
    WithinBand,
    /// Threshold fired but the trend filter did not agree
    TrendNotConfirmed,
    /// Not enough candles to compute features
    NotEnoughData,
    /// Features were NaN or infinite
    NonFiniteFeatures,
    /// The model produced a NaN probability
    InvalidProbability,
}

/// A trade decision and the probability that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Action to take
    pub kind: DecisionKind,
    /// Model P(up)
    pub probability: f64,
    /// `p` for BUY, `1 - p` for SELL, 0.5 for FLAT
    pub confidence: f64,
    /// Reason for the outcome
    pub reason: DecisionReason,
}

impl Decision {
    /// Build a decision, deriving confidence from the kind
    pub fn new(kind: DecisionKind, probability: f64, reason: DecisionReason) -> Self {
        let confidence = match kind {
            DecisionKind::Buy => probability,
            DecisionKind::Sell => 1.0 - probability,
            DecisionKind::Flat => 0.5,
        };
        Self {
            kind,
            probability,
            confidence,
            reason,
        }
    }

    /// A FLAT decision
    pub fn flat(probability: f64, reason: DecisionReason) -> Self {
        Self::new(DecisionKind::Flat, probability, reason)
    }
}
