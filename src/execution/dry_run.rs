//! Dry-run executor
//!
//! Logs and records intents without touching an exchange

use super::{ExecutionError, OrderExecutor, OrderId, OrderIntent};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Executor that accepts every valid intent and keeps it in memory
#[derive(Clone, Default)]
pub struct DryRunExecutor {
    intents: Arc<RwLock<Vec<OrderIntent>>>,
}

impl DryRunExecutor {
    /// Create a new dry-run executor
    pub fn new() -> Self {
        Self::default()
    }

    /// All intents accepted so far
    pub async fn intents(&self) -> Vec<OrderIntent> {
        self.intents.read().await.clone()
    }
}

#[async_trait]
impl OrderExecutor for DryRunExecutor {
    async fn submit(&self, intent: OrderIntent) -> Result<OrderId, ExecutionError> {
        if !intent.side.is_actionable() {
            return Err(ExecutionError::NotActionable(intent.side));
        }
        if intent.notional <= Decimal::ZERO {
            return Err(ExecutionError::InvalidNotional(intent.notional));
        }

        let id = intent.id;
        tracing::info!(
            order_id = %id,
            side = %intent.side,
            probability = intent.probability,
            risk_factor = intent.risk_factor,
            notional = %intent.notional,
            quantity = %intent.quantity,
            "Dry-run order accepted"
        );

        self.intents.write().await.push(intent);
        Ok(id)
    }
}
