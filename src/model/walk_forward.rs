//! Walk-forward retraining
//!
//! Periodically refits a shared model on the newest rolling window. Fits
//! continue from the current weights, so each refit adapts to the recent
//! regime without discarding what earlier windows taught the model.

use super::logistic::FitOutcome;
use super::shared::Refittable;
use crate::config::WalkForwardConfig;
use crate::feed::Candle;
use chrono::{DateTime, Duration, Utc};

/// Resolved scheduler settings
#[derive(Debug, Clone)]
pub struct WalkForwardSettings {
    /// Wall-clock time between refits
    pub interval: Option<Duration>,
    /// New candles between refits
    pub every_candles: Option<usize>,
    /// Most recent candles used per refit
    pub window: usize,
    pub learning_rate: f64,
    pub epochs: usize,
}

impl WalkForwardSettings {
    /// Whether any cadence is configured
    pub fn enabled(&self) -> bool {
        self.interval.is_some() || self.every_candles.is_some()
    }
}

impl From<&WalkForwardConfig> for WalkForwardSettings {
    fn from(config: &WalkForwardConfig) -> Self {
        Self {
            interval: i64::try_from(config.interval_minutes)
                .ok()
                .filter(|minutes| *minutes > 0)
                .and_then(Duration::try_minutes),
            every_candles: (config.every_candles > 0).then_some(config.every_candles),
            window: config.window,
            learning_rate: config.learning_rate,
            epochs: config.epochs,
        }
    }
}

/// What a scheduler evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefitOutcome {
    /// No cadence elapsed (or scheduling disabled)
    NotDue,
    /// The model was refit on `window` candles
    Refit { window: usize, samples: usize },
    /// Triggered, but the window was too short to train on
    Skipped { candles: usize },
}

/// Decides when to refit and counts executed refits
#[derive(Debug)]
pub struct WalkForwardScheduler {
    settings: WalkForwardSettings,
    last_trigger: Option<DateTime<Utc>>,
    last_candle: Option<DateTime<Utc>>,
    refits: u64,
}

impl WalkForwardScheduler {
    /// Create a scheduler
    pub fn new(settings: WalkForwardSettings) -> Self {
        Self {
            settings,
            last_trigger: None,
            last_candle: None,
            refits: 0,
        }
    }

    /// Scheduler settings
    pub fn settings(&self) -> &WalkForwardSettings {
        &self.settings
    }

    /// Number of refits that actually updated the model
    pub fn refit_count(&self) -> u64 {
        self.refits
    }

    /// Time of the last trigger, executed or skipped
    pub fn last_trigger(&self) -> Option<DateTime<Utc>> {
        self.last_trigger
    }

    /// Candles newer than the one seen at the last trigger
    fn new_candles(&self, candles: &[Candle]) -> usize {
        match self.last_candle {
            Some(seen) => candles
                .iter()
                .rev()
                .take_while(|c| c.timestamp > seen)
                .count(),
            None => candles.len(),
        }
    }

    /// Whether a refit is due at `now`
    pub fn is_due(&self, candles: &[Candle], now: DateTime<Utc>) -> bool {
        if !self.settings.enabled() {
            return false;
        }
        let Some(last) = self.last_trigger else {
            return true;
        };

        let interval_due = self
            .settings
            .interval
            .is_some_and(|interval| now - last >= interval);
        let candles_due = self
            .settings
            .every_candles
            .is_some_and(|every| self.new_candles(candles) >= every);

        interval_due || candles_due
    }

    /// Refit `model` on the newest window if a cadence has elapsed
    ///
    /// A skipped trigger still restarts both cadences, so a short history is
    /// retried on the next cadence rather than on every cycle.
    pub fn maybe_refit<M: Refittable + ?Sized>(
        &mut self,
        model: &M,
        candles: &[Candle],
        now: DateTime<Utc>,
    ) -> RefitOutcome {
        if !self.is_due(candles, now) {
            return RefitOutcome::NotDue;
        }

        self.last_trigger = Some(now);
        self.last_candle = candles.last().map(|c| c.timestamp);

        let start = candles.len().saturating_sub(self.settings.window);
        let window = &candles[start..];

        match model.refit(window, self.settings.learning_rate, self.settings.epochs) {
            FitOutcome::Trained { samples, .. } => {
                self.refits += 1;
                tracing::info!(
                    window = window.len(),
                    samples,
                    refits = self.refits,
                    "Walk-forward refit complete"
                );
                RefitOutcome::Refit {
                    window: window.len(),
                    samples,
                }
            }
            FitOutcome::InsufficientHistory { candles } => {
                tracing::debug!(candles, "Walk-forward refit skipped: not enough history");
                RefitOutcome::Skipped { candles }
            }
        }
    }
}
