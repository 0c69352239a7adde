//! Execution module
//!
//! Order submission seam; only a dry-run executor ships

mod dry_run;
mod types;

pub use dry_run::DryRunExecutor;
pub use types::{OrderId, OrderIntent};

use crate::signal::DecisionKind;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Order submission failures
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("decision {0} is not actionable")]
    NotActionable(DecisionKind),
    #[error("invalid notional {0}")]
    InvalidNotional(Decimal),
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Trait for order executors
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit an order intent
    async fn submit(&self, intent: OrderIntent) -> Result<OrderId, ExecutionError>;
}
