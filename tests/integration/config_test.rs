//! Integration tests for configuration loading

use micro_signal::config::{Config, ModelMode};
use micro_signal::signal::Thresholds;
use rust_decimal_macros::dec;

#[test]
fn test_example_config_is_valid() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();

    assert_eq!(config.model.mode, ModelMode::Baseline);
    assert_eq!(config.risk.risk_per_trade_pct, dec!(0.25));

    let thresholds = Thresholds::from(&config.strategy);
    assert_eq!(thresholds.buy, 0.55);
    assert_eq!(thresholds.sell, 0.45);
    assert!(thresholds.use_ma_filter);
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = Config::default();
    config.model.seed = Some(11);
    config.walk_forward.every_candles = 30;

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    assert_eq!(parsed.model.seed, Some(11));
    assert_eq!(parsed.walk_forward.every_candles, 30);
    assert_eq!(parsed.risk.equity_usd, config.risk.equity_usd);
}
