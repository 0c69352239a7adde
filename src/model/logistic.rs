//! Online logistic-regression signal model
//!
//! A four-weight logistic model producing P(next close is higher). Weights
//! start as tiny Gaussian noise and are only ever changed in place by
//! [`SignalModel::fit`], so successive fits warm-start from prior learning.

use super::dataset::{build_dataset, Dataset};
use super::features::FEATURE_COUNT;
use super::seed::SeedProvider;
use super::ProbabilityModel;
use crate::feed::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Fewer candles than this and `fit` leaves the model untouched
pub const MIN_TRAINING_CANDLES: usize = 40;

/// Linear scores beyond +/- this saturate to exactly 1.0 / 0.0
const SCORE_CLAMP: f64 = 20.0;

/// Standard deviation of the initial weights
const INIT_WEIGHT_SCALE: f64 = 0.01;

/// Probability returned when features cannot be scored
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Result of a call to [`SignalModel::fit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Gradient updates were applied
    Trained { samples: usize, epochs: usize },
    /// Below [`MIN_TRAINING_CANDLES`]; weights and bias unchanged
    InsufficientHistory { candles: usize },
}

impl FitOutcome {
    /// Whether any update pass ran
    pub fn trained(&self) -> bool {
        matches!(self, FitOutcome::Trained { .. })
    }
}

/// Logistic squashing with hard saturation outside [-20, 20]
pub fn sigmoid(z: f64) -> f64 {
    if z > SCORE_CLAMP {
        return 1.0;
    }
    if z < -SCORE_CLAMP {
        return 0.0;
    }
    1.0 / (1.0 + (-z).exp())
}

/// Tiny logistic regression over the four candle features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalModel {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl SignalModel {
    /// Initialize weights from N(0, 0.01^2) using a deterministic RNG
    pub fn new(seed: u64) -> Self {
        let mut weights = [0.0; FEATURE_COUNT];
        init_weights(seed, &mut weights);
        Self { weights, bias: 0.0 }
    }

    /// Initialize from a seed provider
    pub fn from_seed_provider(provider: &dyn SeedProvider) -> Self {
        Self::new(provider.seed())
    }

    /// Build a model with explicit parameters
    pub fn with_weights(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Current weights in feature order
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Current bias
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Linear score `bias + w . x`, or None on a length mismatch
    pub fn score(&self, features: &[f64]) -> Option<f64> {
        if features.len() != self.weights.len() {
            return None;
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Some(self.bias + dot)
    }

    /// P(up) for a feature row; exactly 0.5 if the row has the wrong length
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self.score(features) {
            Some(z) => sigmoid(z),
            None => NEUTRAL_PROBABILITY,
        }
    }

    /// Train on `candles` with single-sample gradient descent
    ///
    /// Samples are visited in chronological order every epoch and each
    /// update is applied before the next sample is scored.
    pub fn fit(&mut self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        if candles.len() < MIN_TRAINING_CANDLES {
            return FitOutcome::InsufficientHistory {
                candles: candles.len(),
            };
        }

        let dataset = build_dataset(candles);
        self.fit_dataset(&dataset, learning_rate, epochs);
        FitOutcome::Trained {
            samples: dataset.len(),
            epochs,
        }
    }

    /// Run SGD epochs over a prebuilt dataset
    pub fn fit_dataset(&mut self, dataset: &Dataset, learning_rate: f64, epochs: usize) {
        for _ in 0..epochs {
            for (x, &y) in dataset.features.iter().zip(&dataset.labels) {
                let gradient = self.predict(x) - y;
                for (w, xj) in self.weights.iter_mut().zip(x) {
                    *w -= learning_rate * gradient * xj;
                }
                self.bias -= learning_rate * gradient;
            }
        }
    }
}

impl ProbabilityModel for SignalModel {
    fn predict(&self, features: &[f64]) -> f64 {
        SignalModel::predict(self, features)
    }
}

/// Fill `weights` with N(0, 0.01^2) draws from an RNG seeded by `seed`
pub(super) fn init_weights(seed: u64, weights: &mut [f64]) {
    let mut rng = StdRng::seed_from_u64(seed);
    for w in weights.iter_mut() {
        let z: f64 = rng.sample(StandardNormal);
        *w = z * INIT_WEIGHT_SCALE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixedSeed;
    use chrono::{Duration, Utc};

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        let start = Utc::now();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::from_close(start + Duration::minutes(i as i64), c))
            .collect()
    }

    fn market(n: usize) -> Vec<Candle> {
        let closes: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                100.0 + (t * 0.37).sin() * 1.5 + (t * 0.11).cos() * 0.8 + t * 0.02
            })
            .collect();
        candles_from(&closes)
    }

    #[test]
    fn test_initial_weights_small_and_bias_zero() {
        let model = SignalModel::new(42);
        assert_eq!(model.bias(), 0.0);
        assert_eq!(model.weights().len(), FEATURE_COUNT);
        assert!(model.weights().iter().all(|w| w.abs() < 0.1));
        assert!(model.weights().iter().any(|w| *w != 0.0));
    }

    #[test]
    fn test_init_weights_distribution() {
        let mut draws = vec![0.0; 20_000];
        init_weights(3, &mut draws);

        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let std = (draws.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert!(mean.abs() < 0.0005);
        assert!((std - 0.01).abs() < 0.0005);
    }

    #[test]
    fn test_same_seed_same_weights() {
        assert_eq!(SignalModel::new(7), SignalModel::new(7));
        assert_ne!(SignalModel::new(7), SignalModel::new(8));
        assert_eq!(
            SignalModel::from_seed_provider(&FixedSeed(7)),
            SignalModel::new(7)
        );
    }

    #[test]
    fn test_predict_length_mismatch_is_neutral() {
        let model = SignalModel::with_weights([5.0, 5.0, 5.0, 5.0], 3.0);
        assert_eq!(model.predict(&[1.0, 2.0, 3.0]), 0.5);
        assert_eq!(model.predict(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.5);
        assert_eq!(model.predict(&[]), 0.5);
    }

    #[test]
    fn test_predict_saturates() {
        let model = SignalModel::with_weights([1.0, 0.0, 0.0, 0.0], 0.0);
        assert_eq!(model.predict(&[20.5, 0.0, 0.0, 0.0]), 1.0);
        assert_eq!(model.predict(&[-20.5, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_predict_logistic_in_range() {
        let model = SignalModel::with_weights([1.0, 0.0, 0.0, 0.0], 0.0);
        for z in [-19.9, -3.0, -0.5, 0.0, 0.5, 3.0, 19.9, 20.0, -20.0] {
            let expected = 1.0 / (1.0 + f64::exp(-z));
            assert!((model.predict(&[z, 0.0, 0.0, 0.0]) - expected).abs() < 1e-12);
        }
        assert_eq!(model.predict(&[0.0; 4]), 0.5);
    }

    #[test]
    fn test_predict_uses_bias() {
        let model = SignalModel::with_weights([0.0; 4], 2.0);
        let expected = 1.0 / (1.0 + f64::exp(-2.0));
        assert!((model.predict(&[9.0, 9.0, 9.0, 9.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fit_below_minimum_is_noop() {
        let mut model = SignalModel::new(3);
        let before = model.clone();
        let outcome = model.fit(&market(39), 0.05, 4);

        assert_eq!(outcome, FitOutcome::InsufficientHistory { candles: 39 });
        assert!(!outcome.trained());
        for (a, b) in model.weights().iter().zip(before.weights()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(model.bias().to_bits(), before.bias().to_bits());
    }

    #[test]
    fn test_fit_changes_weights() {
        let mut model = SignalModel::new(3);
        let before = model.clone();
        let outcome = model.fit(&market(40), 0.05, 1);

        assert_eq!(
            outcome,
            FitOutcome::Trained {
                samples: 18,
                epochs: 1
            }
        );
        assert_ne!(model, before);
    }

    #[test]
    fn test_fit_deterministic() {
        let candles = market(200);
        let mut a = SignalModel::new(11);
        let mut b = SignalModel::new(11);
        a.fit(&candles, 0.05, 4);
        b.fit(&candles, 0.05, 4);

        for (x, y) in a.weights().iter().zip(b.weights()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
        assert_eq!(a.bias().to_bits(), b.bias().to_bits());
    }

    #[test]
    fn test_fit_zero_epochs_is_noop() {
        let mut model = SignalModel::new(5);
        let before = model.clone();
        model.fit(&market(100), 0.05, 0);
        assert_eq!(model, before);
    }

    #[test]
    fn test_fit_is_sequential_sgd() {
        // Two samples, one epoch; the second gradient must see the first update
        let dataset = Dataset {
            features: vec![[1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]],
            labels: vec![1.0, 1.0],
            indices: vec![21, 22],
            skipped: 0,
        };
        let lr = 0.5;
        let mut model = SignalModel::with_weights([0.0; 4], 0.0);
        model.fit_dataset(&dataset, lr, 1);

        // Step 1: p = 0.5, g = -0.5 -> w0 = 0.25, b = 0.25
        let g1 = 0.5 - 1.0;
        let (w1, b1) = (-lr * g1, -lr * g1);
        // Step 2 scores with updated params
        let g2 = sigmoid(b1 + w1) - 1.0;
        let (w2, b2) = (w1 - lr * g2, b1 - lr * g2);

        assert!((model.weights()[0] - w2).abs() < 1e-15);
        assert!((model.bias() - b2).abs() < 1e-15);

        // A batch update would apply both gradients at p = 0.5
        let batch_w = -lr * (g1 + g1);
        assert!((model.weights()[0] - batch_w).abs() > 1e-6);
    }

    #[test]
    fn test_fit_learns_persistent_drift() {
        // Every next close is higher, so the model should lean towards up
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + i as f64 * 0.5).collect();
        let candles = candles_from(&closes);
        let mut model = SignalModel::with_weights([0.0; 4], 0.0);
        model.fit(&candles, 0.05, 4);

        assert!(model.bias() > 0.0);
    }

    #[test]
    fn test_fit_warm_starts() {
        let candles = market(120);
        let mut once = SignalModel::new(9);
        once.fit(&candles, 0.05, 2);

        let mut twice = SignalModel::new(9);
        twice.fit(&candles, 0.05, 1);
        twice.fit(&candles, 0.05, 1);

        // Two one-epoch fits continue from the same state as one two-epoch fit
        for (x, y) in once.weights().iter().zip(twice.weights()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
