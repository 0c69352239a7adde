//! Signal model module
//!
//! Feature extraction, the online logistic micro-model, the extended
//! mini-batch head, the lock-guarded handles shared between decision and
//! training paths, and walk-forward retraining

mod dataset;
mod extended;
mod extended_features;
mod features;
mod logistic;
mod seed;
mod shared;
mod walk_forward;

pub use dataset::{build_dataset, Dataset};
pub use extended::{ExtendedLogit, MiniBatchSettings, MIN_EXTENDED_ROWS};
pub use extended_features::{
    ExtendedFeatureExtractor, ExtendedRow, EXTENDED_FEATURE_COUNT, EXTENDED_START_INDEX,
    MIN_EXTENDED_CANDLES,
};
pub use features::{
    compute_features, FeatureExtractor, FeatureVector, FEATURE_COUNT, MIN_FEATURE_INDEX,
};
pub use logistic::{
    sigmoid, FitOutcome, SignalModel, MIN_TRAINING_CANDLES, NEUTRAL_PROBABILITY,
};
pub use seed::{seed_provider, EntropySeed, FixedSeed, SeedProvider};
pub use shared::{Refittable, SharedExtendedModel, SharedModel};
pub use walk_forward::{RefitOutcome, WalkForwardScheduler, WalkForwardSettings};

/// Trait for models producing P(next close is higher)
pub trait ProbabilityModel: Send + Sync {
    /// Probability in [0, 1] for a feature row
    fn predict(&self, features: &[f64]) -> f64;
}
