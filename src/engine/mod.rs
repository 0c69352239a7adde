//! Decision loop
//!
//! Wires the model, decision engine, risk sizer and walk-forward scheduler
//! to the observability sink and the order executor.

mod decision_loop;
mod report;

pub use decision_loop::DecisionLoop;
pub use report::{ReplaySummary, StepReport};
