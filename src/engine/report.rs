//! Per-cycle and per-run reports

use crate::execution::OrderId;
use crate::model::RefitOutcome;
use crate::risk::PositionSize;
use crate::signal::{Decision, DecisionKind};
use chrono::{DateTime, Utc};

/// What one decision cycle did
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Timestamp of the newest candle, if any
    pub candle_time: Option<DateTime<Utc>>,
    /// Walk-forward scheduler result
    pub refit: RefitOutcome,
    /// Decision emitted this cycle
    pub decision: Decision,
    /// Risk factor and order size
    pub size: PositionSize,
    /// Id of the submitted order, when one was accepted
    pub order_id: Option<OrderId>,
}

impl StepReport {
    /// Whether an order was accepted by the executor
    pub fn submitted(&self) -> bool {
        self.order_id.is_some()
    }
}

/// Totals over a replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub buys: usize,
    pub sells: usize,
    pub flats: usize,
    pub refits: u64,
    pub orders: usize,
}

impl ReplaySummary {
    /// Fold one cycle into the totals
    pub fn record(&mut self, report: &StepReport) {
        self.cycles += 1;
        match report.decision.kind {
            DecisionKind::Buy => self.buys += 1,
            DecisionKind::Sell => self.sells += 1,
            DecisionKind::Flat => self.flats += 1,
        }
        if report.submitted() {
            self.orders += 1;
        }
    }
}
