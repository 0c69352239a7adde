//! CLI interface for micro-signal
//!
//! Provides subcommands for:
//! - `run`: Replay a candle file through the live decision loop
//! - `fit`: Train once and print the model parameters
//! - `config`: Show the effective configuration

mod fit;
mod run;

pub use fit::FitArgs;
pub use run::RunArgs;

use crate::config::Config;
use crate::feed::{Candle, CandleFeed, CsvCandleFeed};
use crate::model::{
    seed_provider, ExtendedLogit, MiniBatchSettings, SharedExtendedModel, SharedModel, SignalModel,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "micro-signal")]
#[command(about = "Candle-driven trading bot with an online logistic micro-model")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay candles through the decision loop (dry run)
    Run(RunArgs),
    /// Train once on a candle file and print the weights as JSON
    Fit(FitArgs),
    /// Show effective configuration
    Config,
}

/// Read candles from `path`, or from the configured CSV when unset
async fn load_candles(
    config: &Config,
    path: Option<&PathBuf>,
    limit: usize,
) -> anyhow::Result<Vec<Candle>> {
    let path = path.unwrap_or(&config.feed.csv_path);
    let feed = CsvCandleFeed::new(path.clone());
    let candles = feed.recent_candles(limit).await?;
    tracing::info!(path = %path.display(), candles = candles.len(), "Loaded candles");
    Ok(candles)
}

/// Fresh model seeded from config or `seed`
fn build_model(config: &Config, seed: Option<u64>) -> SharedModel {
    let provider = seed_provider(seed.or(config.model.seed));
    SharedModel::new(SignalModel::from_seed_provider(provider.as_ref()))
}

/// Fresh extended head seeded from config or `seed`
fn build_extended_model(config: &Config, seed: Option<u64>) -> SharedExtendedModel {
    let provider = seed_provider(seed.or(config.model.seed));
    SharedExtendedModel::new(ExtendedLogit::new(
        provider.seed(),
        MiniBatchSettings::from(&config.model),
    ))
}
