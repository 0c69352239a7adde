//! Training dataset construction

use super::features::{FeatureExtractor, FEATURE_COUNT, MIN_FEATURE_INDEX};
use crate::feed::Candle;

/// Chronologically ordered (feature, label) pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Feature rows in model order
    pub features: Vec<[f64; FEATURE_COUNT]>,
    /// 1.0 if the next candle closed higher, else 0.0
    pub labels: Vec<f64>,
    /// Candle index each sample was taken from
    pub indices: Vec<usize>,
    /// Indices dropped because a feature was not finite
    pub skipped: usize,
}

impl Dataset {
    /// Number of usable samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no samples were produced
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Build samples for every index `21 <= i <= n - 2`
///
/// The label for index `i` is 1 iff `close[i + 1] > close[i]`.
pub fn build_dataset(candles: &[Candle]) -> Dataset {
    let extractor = FeatureExtractor::new(candles);
    let mut dataset = Dataset::default();

    for i in MIN_FEATURE_INDEX..candles.len().saturating_sub(1) {
        let Some(features) = extractor.features_at(i) else {
            continue;
        };
        if !features.is_finite() {
            dataset.skipped += 1;
            continue;
        }

        let label = if candles[i + 1].close > candles[i].close {
            1.0
        } else {
            0.0
        };
        dataset.features.push(features.to_array());
        dataset.labels.push(label);
        dataset.indices.push(i);
    }

    dataset
}
