//! Per-candle decision cycle
//!
//! Each cycle: maybe refit, extract features, predict, apply thresholds and
//! the trend gate, size the order, report, and hand actionable decisions to
//! the executor.

use super::report::{ReplaySummary, StepReport};
use crate::config::{Config, ModelMode};
use crate::execution::{OrderExecutor, OrderIntent};
use crate::feed::Candle;
use crate::model::{
    seed_provider, ExtendedLogit, FeatureExtractor, FitOutcome, MiniBatchSettings, RefitOutcome,
    SharedExtendedModel, SharedModel, WalkForwardScheduler, WalkForwardSettings,
    MIN_TRAINING_CANDLES, NEUTRAL_PROBABILITY,
};
use crate::risk::RiskSizer;
use crate::signal::{
    Decision, DecisionReason, EmaRegimeGate, ThresholdDecisionEngine, Thresholds, TrendGate,
};
use crate::telemetry::ObservabilitySink;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// The live decision loop
pub struct DecisionLoop {
    model: SharedModel,
    extended: Option<SharedExtendedModel>,
    engine: ThresholdDecisionEngine,
    gate: Box<dyn TrendGate>,
    sizer: RiskSizer,
    scheduler: WalkForwardScheduler,
    sink: Arc<dyn ObservabilitySink>,
    executor: Arc<dyn OrderExecutor>,
    equity: Decimal,
    warmup_learning_rate: f64,
    warmup_epochs: usize,
    extended_epochs: usize,
    mode: ModelMode,
    history: Vec<Candle>,
    max_history: usize,
}

impl DecisionLoop {
    /// Wire a loop from configuration
    ///
    /// In extended mode a fresh extended head is seeded from `model.seed`;
    /// walk-forward refits then target that head with its own epoch count.
    pub fn new(
        config: &Config,
        model: SharedModel,
        sink: Arc<dyn ObservabilitySink>,
        executor: Arc<dyn OrderExecutor>,
    ) -> Self {
        let mode = config.model.mode;
        sink.set_model_mode(mode);

        let mut settings = WalkForwardSettings::from(&config.walk_forward);
        let extended = match mode {
            ModelMode::Baseline => None,
            ModelMode::Extended => {
                settings.epochs = config.model.extended_epochs;
                let seed = seed_provider(config.model.seed).seed();
                Some(SharedExtendedModel::new(ExtendedLogit::new(
                    seed,
                    MiniBatchSettings::from(&config.model),
                )))
            }
        };

        Self {
            model,
            extended,
            engine: ThresholdDecisionEngine::new(Thresholds::from(&config.strategy)),
            gate: Box::new(EmaRegimeGate::new()),
            sizer: RiskSizer::from_config(&config.risk),
            scheduler: WalkForwardScheduler::new(settings),
            sink,
            executor,
            equity: config.risk.equity_usd,
            warmup_learning_rate: config.model.learning_rate,
            warmup_epochs: config.model.epochs,
            extended_epochs: config.model.extended_epochs,
            mode,
            history: Vec::new(),
            max_history: config.feed.max_history_candles.max(1),
        }
    }

    /// Replace the trend gate
    pub fn with_gate(mut self, gate: Box<dyn TrendGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the extended head; ignored in baseline mode
    pub fn with_extended(mut self, head: SharedExtendedModel) -> Self {
        if self.mode == ModelMode::Extended {
            self.extended = Some(head);
        }
        self
    }

    /// Configured model mode
    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    /// Shared baseline model handle
    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// Extended head, present only in extended mode
    pub fn extended_model(&self) -> Option<&SharedExtendedModel> {
        self.extended.as_ref()
    }

    /// Walk-forward scheduler state
    pub fn scheduler(&self) -> &WalkForwardScheduler {
        &self.scheduler
    }

    /// Rolling candle history
    pub fn history(&self) -> &[Candle] {
        &self.history
    }

    /// Seed the history and train once on it; not counted as a refit
    ///
    /// The baseline model is always fit. In extended mode the extended head
    /// is fit as well.
    pub fn warm_up(&mut self, candles: &[Candle]) -> FitOutcome {
        let start = candles.len().saturating_sub(self.max_history);
        self.history = candles[start..].to_vec();

        let outcome = self
            .model
            .fit(&self.history, self.warmup_learning_rate, self.warmup_epochs);
        tracing::info!(candles = self.history.len(), ?outcome, "Warm-up fit");

        if let Some(head) = &self.extended {
            let extended =
                head.fit(&self.history, self.warmup_learning_rate, self.extended_epochs);
            tracing::info!(candles = self.history.len(), outcome = ?extended, "Extended warm-up fit");
        }
        outcome
    }

    /// Append a candle to the history and run one cycle
    pub async fn on_candle(&mut self, candle: Candle, now: DateTime<Utc>) -> StepReport {
        self.history.push(candle);
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }

        let history = std::mem::take(&mut self.history);
        let report = self.step(&history, now).await;
        self.history = history;
        report
    }

    /// Run one decision cycle over `candles`
    pub async fn step(&mut self, candles: &[Candle], now: DateTime<Utc>) -> StepReport {
        self.sink.set_model_mode(self.mode);

        let refit = match &self.extended {
            Some(head) => self.scheduler.maybe_refit(head, candles, now),
            None => self.scheduler.maybe_refit(&self.model, candles, now),
        };
        if matches!(refit, RefitOutcome::Refit { .. }) {
            self.sink.record_refit();
        }

        let decision = self.decide(candles);
        let size = self.sizer.size(&decision, candles, self.equity);

        self.sink.set_risk_factor(size.risk_factor);
        self.sink.record_decision(decision.kind);

        let candle_time = candles.last().map(|c| c.timestamp);
        tracing::debug!(
            kind = %decision.kind,
            probability = decision.probability,
            reason = ?decision.reason,
            risk_factor = size.risk_factor,
            "Decision"
        );

        let mut order_id = None;
        if decision.kind.is_actionable() {
            let intent = OrderIntent::new(
                decision.kind,
                decision.probability,
                size.risk_factor,
                size.notional,
                size.quantity,
                candle_time.unwrap_or(now),
            );
            match self.executor.submit(intent).await {
                Ok(id) => order_id = Some(id),
                Err(e) => tracing::warn!(error = %e, kind = %decision.kind, "Order submission failed"),
            }
        }

        StepReport {
            candle_time,
            refit,
            decision,
            size,
            order_id,
        }
    }

    fn decide(&self, candles: &[Candle]) -> Decision {
        if candles.len() < MIN_TRAINING_CANDLES {
            return Decision::flat(NEUTRAL_PROBABILITY, DecisionReason::NotEnoughData);
        }

        let features = match FeatureExtractor::new(candles).latest() {
            Some(f) if f.is_finite() => f,
            _ => {
                return Decision::flat(NEUTRAL_PROBABILITY, DecisionReason::NonFiniteFeatures);
            }
        };

        let probability = self
            .extended
            .as_ref()
            .and_then(|head| head.predict_latest(candles))
            .unwrap_or_else(|| self.model.predict(&features.to_array()));
        self.engine.decide(probability, self.gate.as_ref(), candles)
    }

    /// Replay `candles`: the first `warmup` seed the model, the rest run one
    /// cycle each, using the candle timestamp as the clock
    pub async fn replay(
        &mut self,
        candles: &[Candle],
        warmup: usize,
        pace: Option<Duration>,
    ) -> ReplaySummary {
        let warmup = warmup.min(candles.len());
        self.warm_up(&candles[..warmup]);

        let mut summary = ReplaySummary::default();
        for candle in &candles[warmup..] {
            let report = self.on_candle(*candle, candle.timestamp).await;
            summary.record(&report);

            if let Some(pace) = pace {
                tokio::time::sleep(pace).await;
            }
        }
        summary.refits = self.scheduler.refit_count();

        tracing::info!(
            cycles = summary.cycles,
            buys = summary.buys,
            sells = summary.sells,
            flats = summary.flats,
            refits = summary.refits,
            orders = summary.orders,
            "Replay complete"
        );
        summary
    }
}
