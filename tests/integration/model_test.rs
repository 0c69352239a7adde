//! Property tests for the signal model

use chrono::{Duration, TimeZone, Utc};
use micro_signal::feed::Candle;
use micro_signal::model::{FitOutcome, SignalModel};
use proptest::prelude::*;

fn candles_from(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::from_close(start + Duration::minutes(i as i64), c))
        .collect()
}

proptest! {
    #[test]
    fn prop_predict_in_unit_interval(
        weights in prop::array::uniform4(-50.0f64..50.0),
        bias in -50.0f64..50.0,
        features in prop::array::uniform4(-10.0f64..10.0),
    ) {
        let model = SignalModel::with_weights(weights, bias);
        let p = model.predict(&features);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prop_wrong_length_is_neutral(
        seed in any::<u64>(),
        features in prop::collection::vec(-1.0f64..1.0, 0..10),
    ) {
        prop_assume!(features.len() != 4);
        let model = SignalModel::new(seed);
        prop_assert_eq!(model.predict(&features), 0.5);
    }

    #[test]
    fn prop_short_history_never_trains(
        seed in any::<u64>(),
        closes in prop::collection::vec(50.0f64..150.0, 0..40),
    ) {
        let mut model = SignalModel::new(seed);
        let before = model.clone();
        let outcome = model.fit(&candles_from(&closes), 0.05, 4);

        let is_insufficient = matches!(outcome, FitOutcome::InsufficientHistory { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(model, before);
    }

    #[test]
    fn prop_fit_keeps_predictions_bounded(
        seed in any::<u64>(),
        closes in prop::collection::vec(50.0f64..150.0, 40..120),
    ) {
        let candles = candles_from(&closes);
        let mut model = SignalModel::new(seed);
        model.fit(&candles, 0.05, 3);

        prop_assert!(model.weights().iter().all(|w| w.is_finite()));
        prop_assert!(model.bias().is_finite());
        let p = model.predict(&[0.01, -0.02, 0.5, 1.0]);
        prop_assert!((0.0..=1.0).contains(&p));
    }
}
