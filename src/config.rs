//! Configuration types for micro-signal
//!
//! Loaded once from TOML, then patched from the process environment.

use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("threshold {name} = {value} is outside [0, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("buy threshold {buy} must be greater than sell threshold {sell}")]
    ThresholdOrder { buy: f64, sell: f64 },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub walk_forward: WalkForwardConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Candle source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// CSV file of candles
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    /// Candles kept in the rolling history
    #[serde(default = "default_max_history_candles")]
    pub max_history_candles: usize,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("candles.csv")
}
fn default_max_history_candles() -> usize {
    5000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            max_history_candles: default_max_history_candles(),
        }
    }
}

/// Decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// BUY when p >= this
    #[serde(default = "default_buy_threshold")]
    pub buy_threshold: f64,

    /// SELL when p <= this
    #[serde(default = "default_sell_threshold")]
    pub sell_threshold: f64,

    /// Require EMA trend confirmation
    #[serde(default = "default_true")]
    pub use_ma_filter: bool,
}

fn default_buy_threshold() -> f64 {
    0.55
}
fn default_sell_threshold() -> f64 {
    0.45
}
fn default_true() -> bool {
    true
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            buy_threshold: 0.55,
            sell_threshold: 0.45,
            use_ma_filter: true,
        }
    }
}

/// Prediction path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMode {
    #[default]
    Baseline,
    Extended,
}

impl ModelMode {
    pub const ALL: [ModelMode; 2] = [ModelMode::Baseline, ModelMode::Extended];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Baseline => "baseline",
            ModelMode::Extended => "extended",
        }
    }
}

impl FromStr for ModelMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(ModelMode::Baseline),
            "extended" => Ok(ModelMode::Extended),
            other => Err(ConfigError::Invalid {
                field: "model.mode",
                reason: format!("unknown mode {other:?}"),
            }),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub mode: ModelMode,

    /// Weight initialization seed; entropy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Learning rate for the warm-up fit
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Epochs for the warm-up fit
    #[serde(default = "default_warmup_epochs")]
    pub epochs: usize,

    /// Mini-batch size for the extended head
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// L2 penalty for the extended head
    #[serde(default = "default_l2")]
    pub l2: f64,

    /// Epochs for extended head fits (warm-up and walk-forward)
    #[serde(default = "default_extended_epochs")]
    pub extended_epochs: usize,
}

fn default_learning_rate() -> f64 {
    0.05
}
fn default_warmup_epochs() -> usize {
    4
}
fn default_batch_size() -> usize {
    64
}
fn default_l2() -> f64 {
    1e-4
}
fn default_extended_epochs() -> usize {
    6
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mode: ModelMode::Baseline,
            seed: None,
            learning_rate: 0.05,
            epochs: 4,
            batch_size: 64,
            l2: 1e-4,
            extended_epochs: 6,
        }
    }
}

/// Largest wall-clock cadence a millisecond-based duration can hold
pub const MAX_WALK_FORWARD_MINUTES: u64 = i64::MAX as u64 / 60_000;

/// Walk-forward refit cadence; both cadences at 0 disables refits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    /// Wall-clock minutes between refits
    #[serde(default)]
    pub interval_minutes: u64,

    /// New candles between refits
    #[serde(default)]
    pub every_candles: usize,

    /// Most recent candles used per refit
    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_warmup_epochs")]
    pub epochs: usize,
}

fn default_window() -> usize {
    500
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 0,
            every_candles: 0,
            window: 500,
            learning_rate: 0.05,
            epochs: 4,
        }
    }
}

/// Risk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Percent of equity per trade (0.25 = 0.25%)
    #[serde(default = "default_risk_per_trade_pct")]
    pub risk_per_trade_pct: Decimal,

    /// Scale risk by recent volatility
    #[serde(default)]
    pub vol_risk_adjust: bool,

    /// Account equity in quote currency
    #[serde(default = "default_equity_usd")]
    pub equity_usd: Decimal,

    /// Minimum order value
    #[serde(default = "default_order_min_usd")]
    pub order_min_usd: Decimal,
}

fn default_risk_per_trade_pct() -> Decimal {
    Decimal::new(25, 2) // 0.25%
}
fn default_equity_usd() -> Decimal {
    Decimal::new(1000, 0)
}
fn default_order_min_usd() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_per_trade_pct: default_risk_per_trade_pct(),
            vol_risk_adjust: false,
            equity_usd: default_equity_usd(),
            order_min_usd: default_order_min_usd(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; blank or unparseable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        override_parsed(&get, "BUY_THRESHOLD", &mut self.strategy.buy_threshold);
        override_parsed(&get, "SELL_THRESHOLD", &mut self.strategy.sell_threshold);
        if let Some(v) = get("USE_MA_FILTER").and_then(|v| parse_bool(&v)) {
            self.strategy.use_ma_filter = v;
        }

        // Unknown modes fall back to baseline
        if let Some(v) = get("MODEL_MODE") {
            self.model.mode = v.parse().unwrap_or_default();
        }
        override_parsed(&get, "WALK_FORWARD_MIN", &mut self.walk_forward.interval_minutes);

        if let Some(v) = get("VOL_RISK_ADJUST").and_then(|v| parse_bool(&v)) {
            self.risk.vol_risk_adjust = v;
        }
        override_parsed(&get, "RISK_PER_TRADE_PCT", &mut self.risk.risk_per_trade_pct);
        override_parsed(&get, "USD_EQUITY", &mut self.risk.equity_usd);
        override_parsed(&get, "ORDER_MIN_USD", &mut self.risk.order_min_usd);
        override_parsed(&get, "MAX_HISTORY_CANDLES", &mut self.feed.max_history_candles);
    }

    /// Reject configurations the decision loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let StrategyConfig {
            buy_threshold: buy,
            sell_threshold: sell,
            ..
        } = self.strategy;

        for (name, value) in [("buy_threshold", buy), ("sell_threshold", sell)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if buy <= sell {
            return Err(ConfigError::ThresholdOrder { buy, sell });
        }

        if self.risk.risk_per_trade_pct <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "risk.risk_per_trade_pct",
                reason: "must be positive".to_string(),
            });
        }
        if self.risk.equity_usd < Decimal::ZERO || self.risk.order_min_usd < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "risk",
                reason: "amounts must not be negative".to_string(),
            });
        }
        for (field, value) in [
            ("model.learning_rate", self.model.learning_rate),
            ("walk_forward.learning_rate", self.walk_forward.learning_rate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a positive learning rate"),
                });
            }
        }
        if self.walk_forward.interval_minutes > MAX_WALK_FORWARD_MINUTES {
            return Err(ConfigError::Invalid {
                field: "walk_forward.interval_minutes",
                reason: format!(
                    "{} exceeds the maximum of {MAX_WALK_FORWARD_MINUTES}",
                    self.walk_forward.interval_minutes
                ),
            });
        }
        if self.model.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "model.batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.model.l2.is_finite() || self.model.l2 < 0.0 {
            return Err(ConfigError::Invalid {
                field: "model.l2",
                reason: format!("{} is not a non-negative penalty", self.model.l2),
            });
        }
        if self.feed.max_history_candles == 0 {
            return Err(ConfigError::Invalid {
                field: "feed.max_history_candles",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn override_parsed<T, G>(get: &G, key: &str, target: &mut T)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.parse::<T>()) {
        Some(Ok(value)) => *target = value,
        Some(Err(_)) => tracing::warn!(key, "Ignoring unparseable environment override"),
        None => {}
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "y" | "yes" => Some(true),
        "0" | "false" | "n" | "no" => Some(false),
        _ => None,
    }
}
