//! Fit command implementation

use crate::config::{Config, ModelMode};
use crate::model::FitOutcome;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FitArgs {
    /// CSV candle file (defaults to feed.csv_path)
    #[arg(long)]
    pub candles: Option<PathBuf>,

    /// Learning rate (defaults to model.learning_rate)
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Epochs (defaults to model.epochs)
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Weight initialization seed (overrides model.seed)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct FitReport<'a> {
    candles: usize,
    trained: bool,
    samples: usize,
    weights: &'a [f64],
    bias: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended: Option<HeadReport>,
}

#[derive(Debug, Serialize)]
struct HeadReport {
    trained: bool,
    samples: usize,
    weights: Vec<f64>,
    bias: f64,
}

fn samples_of(outcome: FitOutcome, candles: usize) -> usize {
    match outcome {
        FitOutcome::Trained { samples, .. } => samples,
        FitOutcome::InsufficientHistory { .. } => {
            tracing::warn!(candles, "Not enough candles to train");
            0
        }
    }
}

impl FitArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let candles = super::load_candles(
            config,
            self.candles.as_ref(),
            config.feed.max_history_candles,
        )
        .await?;
        let model = super::build_model(config, self.seed);

        let learning_rate = self.learning_rate.unwrap_or(config.model.learning_rate);
        let epochs = self.epochs.unwrap_or(config.model.epochs);
        let outcome = model.fit(&candles, learning_rate, epochs);

        let samples = samples_of(outcome, candles.len());

        let extended = match config.model.mode {
            ModelMode::Baseline => None,
            ModelMode::Extended => {
                let head = super::build_extended_model(config, self.seed);
                let outcome = head.fit(&candles, learning_rate, config.model.extended_epochs);
                let snapshot = head.snapshot();
                Some(HeadReport {
                    trained: outcome.trained(),
                    samples: samples_of(outcome, candles.len()),
                    weights: snapshot.weights().to_vec(),
                    bias: snapshot.bias(),
                })
            }
        };

        let snapshot = model.snapshot();
        let report = FitReport {
            candles: candles.len(),
            trained: outcome.trained(),
            samples,
            weights: snapshot.weights(),
            bias: snapshot.bias(),
            extended,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(())
    }
}
