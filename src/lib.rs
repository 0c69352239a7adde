//! micro-signal: candle-driven trading bot decision core
//!
//! This library provides the core components for:
//! - Candle feeds (CSV replay)
//! - Price indicators (SMA, EMA, RSI, z-score)
//! - An online logistic signal model with walk-forward refits
//! - Threshold decisions with EMA trend confirmation
//! - Volatility-aware risk sizing
//! - Dry-run order execution
//! - Structured logging and metrics

pub mod cli;
pub mod config;
pub mod engine;
pub mod execution;
pub mod feed;
pub mod indicators;
pub mod model;
pub mod risk;
pub mod signal;
pub mod telemetry;
