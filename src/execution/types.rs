//! Execution types

use crate::signal::DecisionKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// An actionable decision turned into an order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Client-side identifier
    pub id: OrderId,
    /// BUY or SELL
    pub side: DecisionKind,
    /// Model probability behind the decision
    pub probability: f64,
    /// Volatility multiplier applied to base risk
    pub risk_factor: f64,
    /// Order value in quote currency
    pub notional: Decimal,
    /// Order quantity in base units
    pub quantity: Decimal,
    /// Timestamp of the candle that produced the decision
    pub timestamp: DateTime<Utc>,
}

impl OrderIntent {
    /// Create an intent with a fresh id
    pub fn new(
        side: DecisionKind,
        probability: f64,
        risk_factor: f64,
        notional: Decimal,
        quantity: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            probability,
            risk_factor,
            notional,
            quantity,
            timestamp,
        }
    }
}
