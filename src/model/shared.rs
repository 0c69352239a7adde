//! Shared model handles
//!
//! The decision path and the walk-forward retrainer use one model instance.
//! Reads take a shared lock; `fit` holds the exclusive lock for its whole
//! run so no reader ever sees weights between two gradient steps.

use super::extended::ExtendedLogit;
use super::logistic::{FitOutcome, SignalModel};
use super::ProbabilityModel;
use crate::feed::Candle;
use parking_lot::RwLock;
use std::sync::Arc;

/// A model the walk-forward scheduler can retrain in place
pub trait Refittable: Send + Sync {
    /// Fit on `candles`, continuing from the current parameters
    fn refit(&self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome;
}

/// Cloneable, lock-guarded handle to a [`SignalModel`]
#[derive(Debug, Clone)]
pub struct SharedModel {
    inner: Arc<RwLock<SignalModel>>,
}

impl SharedModel {
    /// Wrap a model
    pub fn new(model: SignalModel) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// P(up) for a feature row
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.inner.read().predict(features)
    }

    /// Train in place under the write lock
    pub fn fit(&self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        self.inner.write().fit(candles, learning_rate, epochs)
    }

    /// Copy of the current parameters
    pub fn snapshot(&self) -> SignalModel {
        self.inner.read().clone()
    }
}

impl ProbabilityModel for SharedModel {
    fn predict(&self, features: &[f64]) -> f64 {
        SharedModel::predict(self, features)
    }
}

impl Refittable for SharedModel {
    fn refit(&self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        self.fit(candles, learning_rate, epochs)
    }
}

/// Cloneable, lock-guarded handle to an [`ExtendedLogit`]
#[derive(Debug, Clone)]
pub struct SharedExtendedModel {
    inner: Arc<RwLock<ExtendedLogit>>,
}

impl SharedExtendedModel {
    pub fn new(model: ExtendedLogit) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    /// P(up) for the newest candle, once the head has been trained
    pub fn predict_latest(&self, candles: &[Candle]) -> Option<f64> {
        let model = self.inner.read();
        if !model.is_trained() {
            return None;
        }
        model.predict_latest(candles)
    }

    /// Train in place under the write lock
    pub fn fit(&self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        self.inner.write().fit(candles, learning_rate, epochs)
    }

    pub fn is_trained(&self) -> bool {
        self.inner.read().is_trained()
    }

    /// Copy of the current parameters
    pub fn snapshot(&self) -> ExtendedLogit {
        self.inner.read().clone()
    }
}

impl Refittable for SharedExtendedModel {
    fn refit(&self, candles: &[Candle], learning_rate: f64, epochs: usize) -> FitOutcome {
        self.fit(candles, learning_rate, epochs)
    }
}
