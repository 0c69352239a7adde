//! Run command implementation

use crate::config::Config;
use crate::engine::DecisionLoop;
use crate::execution::DryRunExecutor;
use crate::telemetry::MetricsSink;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV candle file (defaults to feed.csv_path)
    #[arg(long)]
    pub candles: Option<PathBuf>,

    /// Candles used for the warm-up fit before the first decision
    #[arg(long, default_value_t = 200)]
    pub warmup: usize,

    /// Delay between cycles in milliseconds
    #[arg(long, default_value_t = 0)]
    pub pace_ms: u64,

    /// Weight initialization seed (overrides model.seed)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let candles = super::load_candles(config, self.candles.as_ref(), usize::MAX).await?;
        let model = super::build_model(config, self.seed);

        let executor = DryRunExecutor::new();
        let mut decision_loop = DecisionLoop::new(
            config,
            model,
            Arc::new(MetricsSink::new()),
            Arc::new(executor.clone()),
        );
        if self.seed.is_some() {
            decision_loop =
                decision_loop.with_extended(super::build_extended_model(config, self.seed));
        }

        let pace = (self.pace_ms > 0).then(|| Duration::from_millis(self.pace_ms));

        tokio::select! {
            summary = decision_loop.replay(&candles, self.warmup, pace) => {
                println!("Replay summary:");
                println!("  Cycles: {}", summary.cycles);
                println!("  BUY: {}  SELL: {}  FLAT: {}", summary.buys, summary.sells, summary.flats);
                println!("  Walk-forward refits: {}", summary.refits);
                println!("  Orders: {}", summary.orders);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(
                    orders = executor.intents().await.len(),
                    "Interrupted, stopping replay"
                );
            }
        }

        Ok(())
    }
}
