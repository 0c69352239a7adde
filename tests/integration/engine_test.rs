//! End-to-end tests for the decision loop

use chrono::{Duration, TimeZone, Utc};
use micro_signal::config::{Config, ModelMode};
use micro_signal::engine::DecisionLoop;
use micro_signal::execution::DryRunExecutor;
use micro_signal::feed::{Candle, CandleFeed, CsvCandleFeed};
use micro_signal::model::{FixedSeed, SharedModel, SignalModel};
use micro_signal::signal::DecisionKind;
use micro_signal::telemetry::RecordingSink;
use std::io::Write;
use std::sync::Arc;

fn market(n: usize) -> Vec<Candle> {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    (0..n)
        .map(|i| {
            let t = i as f64;
            Candle::from_close(
                start + Duration::minutes(i as i64),
                100.0 + (t * 0.21).sin() * 2.0 + (t * 0.05).cos() * 3.0,
            )
        })
        .collect()
}

fn seeded_model() -> SharedModel {
    SharedModel::new(SignalModel::from_seed_provider(&FixedSeed(42)))
}

#[tokio::test]
async fn test_extended_replay_refits_head() {
    let mut config = Config::default();
    config.model.mode = ModelMode::Extended;
    config.model.seed = Some(42);
    config.walk_forward.every_candles = 50;
    config.walk_forward.window = 200;

    let sink = RecordingSink::new();
    let executor = DryRunExecutor::new();
    let mut decision_loop = DecisionLoop::new(
        &config,
        seeded_model(),
        Arc::new(sink.clone()),
        Arc::new(executor.clone()),
    );

    let candles = market(400);
    let summary = decision_loop.replay(&candles, 200, None).await;

    assert_eq!(summary.cycles, 200);
    // Triggers at 201, 251, 301 and 351 candles, each with 173 rows
    assert_eq!(summary.refits, 4);
    assert_eq!(sink.refits(), 4);
    assert_eq!(sink.model_mode(), Some(ModelMode::Extended));
    assert!(decision_loop.extended_model().unwrap().is_trained());
    assert_eq!(summary.orders, executor.intents().await.len());
}

#[tokio::test]
async fn test_replay_with_candle_cadence_refits() {
    let mut config = Config::default();
    config.walk_forward.every_candles = 50;
    config.walk_forward.window = 200;

    let sink = RecordingSink::new();
    let executor = DryRunExecutor::new();
    let mut decision_loop = DecisionLoop::new(
        &config,
        seeded_model(),
        Arc::new(sink.clone()),
        Arc::new(executor.clone()),
    );

    let candles = market(400);
    let summary = decision_loop.replay(&candles, 100, None).await;

    assert_eq!(summary.cycles, 300);
    assert_eq!(sink.total_decisions(), 300);
    // First cycle, then every 50 new candles
    assert_eq!(summary.refits, 6);
    assert_eq!(sink.refits(), 6);
    assert_eq!(summary.orders, executor.intents().await.len());
    assert_eq!(
        summary.orders,
        summary.buys + summary.sells,
        "every actionable decision reaches the executor"
    );
}

#[tokio::test]
async fn test_replay_is_deterministic_with_fixed_seed() {
    let config = Config::default();
    let candles = market(300);

    let mut totals = Vec::new();
    for _ in 0..2 {
        let mut decision_loop = DecisionLoop::new(
            &config,
            seeded_model(),
            Arc::new(RecordingSink::new()),
            Arc::new(DryRunExecutor::new()),
        );
        let summary = decision_loop.replay(&candles, 120, None).await;
        totals.push((summary, decision_loop.model().snapshot()));
    }

    assert_eq!(totals[0], totals[1]);
}

#[tokio::test]
async fn test_csv_to_decisions() {
    let mut content = String::from("time,open,high,low,close,volume\n");
    for candle in market(120) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            candle.timestamp.to_rfc3339(),
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume
        ));
    }
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();

    let candles = CsvCandleFeed::new(file.path())
        .recent_candles(usize::MAX)
        .await
        .unwrap();
    assert_eq!(candles.len(), 120);

    let sink = RecordingSink::new();
    let mut decision_loop = DecisionLoop::new(
        &Config::default(),
        seeded_model(),
        Arc::new(sink.clone()),
        Arc::new(DryRunExecutor::new()),
    );
    let report = decision_loop.step(&candles, Utc::now()).await;

    assert!((0.0..=1.0).contains(&report.decision.probability));
    assert_eq!(sink.total_decisions(), 1);
    if report.decision.kind == DecisionKind::Flat {
        assert!(!report.submitted());
    }
}
