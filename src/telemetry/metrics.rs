//! Decision-loop metrics
//!
//! Counters and gauges go through the `metrics` facade. Without an installed
//! recorder every call is a no-op.

use crate::config::ModelMode;
use crate::signal::DecisionKind;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Metric names
pub const DECISIONS_TOTAL: &str = "bot_decisions_total";
pub const WALK_FORWARD_FITS_TOTAL: &str = "bot_walk_forward_fits_total";
pub const VOL_RISK_FACTOR: &str = "bot_vol_risk_factor";
pub const MODEL_MODE: &str = "bot_model_mode";

/// Where the decision loop reports what it did
pub trait ObservabilitySink: Send + Sync {
    /// One decision was emitted
    fn record_decision(&self, kind: DecisionKind);
    /// One walk-forward refit ran
    fn record_refit(&self);
    /// Current volatility risk multiplier
    fn set_risk_factor(&self, factor: f64);
    /// Effective model mode; exactly one mode reads 1
    fn set_model_mode(&self, mode: ModelMode);
}

/// Sink backed by the `metrics` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSink;

impl MetricsSink {
    /// Create the sink and register metric descriptions
    pub fn new() -> Self {
        describe_metrics();
        Self
    }
}

fn describe_metrics() {
    describe_counter!(DECISIONS_TOTAL, "Decisions emitted, by signal");
    describe_counter!(WALK_FORWARD_FITS_TOTAL, "Walk-forward refits executed");
    describe_gauge!(VOL_RISK_FACTOR, "Current volatility risk multiplier");
    describe_gauge!(MODEL_MODE, "Active model mode (1 = active)");
}

impl ObservabilitySink for MetricsSink {
    fn record_decision(&self, kind: DecisionKind) {
        counter!(DECISIONS_TOTAL, "signal" => kind.metric_label()).increment(1);
    }

    fn record_refit(&self) {
        counter!(WALK_FORWARD_FITS_TOTAL).increment(1);
    }

    fn set_risk_factor(&self, factor: f64) {
        gauge!(VOL_RISK_FACTOR).set(factor);
    }

    fn set_model_mode(&self, mode: ModelMode) {
        for candidate in ModelMode::ALL {
            let value = if candidate == mode { 1.0 } else { 0.0 };
            gauge!(MODEL_MODE, "mode" => candidate.as_str()).set(value);
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    decisions: HashMap<DecisionKind, u64>,
    refits: u64,
    risk_factor: Option<f64>,
    model_mode: Option<ModelMode>,
    model_mode_updates: u64,
}

/// In-memory sink for inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decisions recorded for `kind`
    pub fn decisions(&self, kind: DecisionKind) -> u64 {
        self.inner.lock().decisions.get(&kind).copied().unwrap_or(0)
    }

    /// Decisions recorded across all kinds
    pub fn total_decisions(&self) -> u64 {
        self.inner.lock().decisions.values().sum()
    }

    pub fn refits(&self) -> u64 {
        self.inner.lock().refits
    }

    pub fn risk_factor(&self) -> Option<f64> {
        self.inner.lock().risk_factor
    }

    pub fn model_mode(&self) -> Option<ModelMode> {
        self.inner.lock().model_mode
    }

    /// Number of model-mode reports received
    pub fn model_mode_updates(&self) -> u64 {
        self.inner.lock().model_mode_updates
    }
}

impl ObservabilitySink for RecordingSink {
    fn record_decision(&self, kind: DecisionKind) {
        *self.inner.lock().decisions.entry(kind).or_insert(0) += 1;
    }

    fn record_refit(&self) {
        self.inner.lock().refits += 1;
    }

    fn set_risk_factor(&self, factor: f64) {
        self.inner.lock().risk_factor = Some(factor);
    }

    fn set_model_mode(&self, mode: ModelMode) {
        let mut inner = self.inner.lock();
        inner.model_mode = Some(mode);
        inner.model_mode_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    type Series = (String, Vec<(String, String)>, DebugValue);

    /// Run `f` against a local debugging recorder and return what it emitted
    fn capture(f: impl FnOnce()) -> Vec<Series> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, f);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(composite, _, _, value)| {
                let key = composite.key();
                let labels = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                (key.name().to_string(), labels, value)
            })
            .collect()
    }

    fn value<'a>(series: &'a [Series], name: &str, label: Option<(&str, &str)>) -> Option<&'a DebugValue> {
        series
            .iter()
            .find(|(n, labels, _)| {
                n == name
                    && match label {
                        Some((k, v)) => labels.iter().any(|(lk, lv)| lk == k && lv == v),
                        None => labels.is_empty(),
                    }
            })
            .map(|(_, _, v)| v)
    }

    fn gauge(value: Option<&DebugValue>) -> Option<f64> {
        match value {
            Some(DebugValue::Gauge(g)) => Some(g.0),
            _ => None,
        }
    }

    #[test]
    fn test_recording_sink_counts() {
        let sink = RecordingSink::new();
        sink.record_decision(DecisionKind::Buy);
        sink.record_decision(DecisionKind::Buy);
        sink.record_decision(DecisionKind::Flat);
        sink.record_refit();

        assert_eq!(sink.decisions(DecisionKind::Buy), 2);
        assert_eq!(sink.decisions(DecisionKind::Sell), 0);
        assert_eq!(sink.total_decisions(), 3);
        assert_eq!(sink.refits(), 1);
    }

    #[test]
    fn test_recording_sink_gauges() {
        let sink = RecordingSink::new();
        assert!(sink.risk_factor().is_none());

        sink.set_risk_factor(0.8);
        sink.set_model_mode(ModelMode::Baseline);

        assert_eq!(sink.risk_factor(), Some(0.8));
        assert_eq!(sink.model_mode(), Some(ModelMode::Baseline));
    }

    #[test]
    fn test_recording_sink_clones_share_state() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        handle.record_refit();
        assert_eq!(sink.refits(), 1);
    }

    #[test]
    fn test_metrics_sink_without_recorder() {
        // No recorder installed: calls must not panic
        let sink = MetricsSink::new();
        sink.record_decision(DecisionKind::Sell);
        sink.record_refit();
        sink.set_risk_factor(1.2);
        sink.set_model_mode(ModelMode::Extended);
    }

    #[test]
    fn test_metrics_sink_decision_counter() {
        let series = capture(|| {
            let sink = MetricsSink::new();
            sink.record_decision(DecisionKind::Buy);
            sink.record_decision(DecisionKind::Buy);
            sink.record_decision(DecisionKind::Flat);
        });

        assert_eq!(
            value(&series, DECISIONS_TOTAL, Some(("signal", "buy"))),
            Some(&DebugValue::Counter(2))
        );
        assert_eq!(
            value(&series, DECISIONS_TOTAL, Some(("signal", "flat"))),
            Some(&DebugValue::Counter(1))
        );
        assert!(value(&series, DECISIONS_TOTAL, Some(("signal", "sell"))).is_none());
    }

    #[test]
    fn test_metrics_sink_refit_counter() {
        let series = capture(|| {
            let sink = MetricsSink::new();
            sink.record_refit();
        });

        assert_eq!(
            value(&series, WALK_FORWARD_FITS_TOTAL, None),
            Some(&DebugValue::Counter(1))
        );
    }

    #[test]
    fn test_metrics_sink_risk_gauge() {
        let series = capture(|| {
            let sink = MetricsSink::new();
            sink.set_risk_factor(1.2);
            sink.set_risk_factor(0.8);
        });

        assert_eq!(gauge(value(&series, VOL_RISK_FACTOR, None)), Some(0.8));
    }

    #[test]
    fn test_metrics_sink_model_mode_exclusive() {
        let series = capture(|| {
            let sink = MetricsSink::new();
            sink.set_model_mode(ModelMode::Baseline);
            sink.set_model_mode(ModelMode::Extended);
        });

        let extended = gauge(value(&series, MODEL_MODE, Some(("mode", "extended"))));
        let baseline = gauge(value(&series, MODEL_MODE, Some(("mode", "baseline"))));
        assert_eq!(extended, Some(1.0));
        assert_eq!(baseline, Some(0.0));
    }
}
