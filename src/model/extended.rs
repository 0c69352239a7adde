//! Extended logistic head
//!
//! An eight-weight logistic model over [`ExtendedRow`] features, trained
//! with L2-regularised mini-batch gradient descent. Like the baseline model
//! it only ever updates in place, so refits warm-start from prior weights.

use super::extended_features::{ExtendedFeatureExtractor, ExtendedRow, EXTENDED_FEATURE_COUNT};
use super::logistic::{init_weights, sigmoid, FitOutcome, NEUTRAL_PROBABILITY};
use super::ProbabilityModel;
use crate::config::ModelConfig;
use crate::feed::Candle;
use serde::{Deserialize, Serialize};

/// Fewer labelled rows than this and `fit` leaves the head untouched
pub const MIN_EXTENDED_ROWS: usize = 100;

/// Mini-batch training parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniBatchSettings {
    pub batch_size: usize,
    pub l2: f64,
}

impl Default for MiniBatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 64,
            l2: 1e-4,
        }
    }
}

impl From<&ModelConfig> for MiniBatchSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            l2: config.l2,
        }
    }
}

/// Logistic regression over the extended feature set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedLogit {
    weights: [f64; EXTENDED_FEATURE_COUNT],
    bias: f64,
    batch_size: usize,
    l2: f64,
    trained: bool,
}

impl ExtendedLogit {
    /// Initialize weights from N(0, 0.01^2) using a deterministic RNG
    pub fn new(seed: u64, settings: MiniBatchSettings) -> Self {
        let mut weights = [0.0; EXTENDED_FEATURE_COUNT];
        init_weights(seed, &mut weights);
        Self {
            weights,
            bias: 0.0,
            batch_size: settings.batch_size.max(1),
            l2: settings.l2,
            trained: false,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Whether at least one fit has updated the head
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// P(up) for a row; exactly 0.5 if the row has the wrong length
    pub fn predict(&self, features: &[f64]) -> f64 {
        if features.len() != self.weights.len() {
            return NEUTRAL_PROBABILITY;
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        sigmoid(self.bias + dot)
    }

    /// P(up) for the newest candle, or None without a finite feature row
    pub fn predict_latest(&self, candles: &[Candle]) -> Option<f64> {
        let row = ExtendedFeatureExtractor::new(candles).latest()?;
        row.iter()
            .all(|v| v.is_finite())
            .then(|| self.predict(&row))
    }

    /// Train on labelled rows built from `candles`
    pub fn fit(&mut self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        let (rows, labels) = ExtendedFeatureExtractor::new(candles).training_rows();
        if rows.len() < MIN_EXTENDED_ROWS {
            return FitOutcome::InsufficientHistory {
                candles: candles.len(),
            };
        }

        self.fit_rows(&rows, &labels, learning_rate, epochs);
        FitOutcome::Trained {
            samples: rows.len(),
            epochs,
        }
    }

    /// Mini-batch epochs over prebuilt rows
    ///
    /// Batches are taken in chronological order. Each step applies the
    /// batch-averaged log-loss gradient plus `l2 * w` to the weights; the
    /// bias is not penalised.
    pub fn fit_rows(
        &mut self,
        rows: &[ExtendedRow],
        labels: &[f64],
        learning_rate: f64,
        epochs: usize,
    ) {
        let n = rows.len().min(labels.len());
        if n == 0 {
            return;
        }

        for _ in 0..epochs {
            for start in (0..n).step_by(self.batch_size) {
                let end = (start + self.batch_size).min(n);
                let mut grad_w = [0.0; EXTENDED_FEATURE_COUNT];
                let mut grad_b = 0.0;

                for (x, &y) in rows[start..end].iter().zip(&labels[start..end]) {
                    let error = self.predict(x) - y;
                    for (g, xj) in grad_w.iter_mut().zip(x) {
                        *g += error * xj;
                    }
                    grad_b += error;
                }

                let size = (end - start) as f64;
                for (w, g) in self.weights.iter_mut().zip(grad_w) {
                    *w -= learning_rate * (g / size + self.l2 * *w);
                }
                self.bias -= learning_rate * grad_b / size;
            }
        }
        self.trained |= epochs > 0;
    }
}

impl ProbabilityModel for ExtendedLogit {
    fn predict(&self, features: &[f64]) -> f64 {
        ExtendedLogit::predict(self, features)
    }
}
