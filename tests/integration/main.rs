//! Integration tests for micro-signal

mod config_test;
mod engine_test;
mod feed_test;
mod model_test;
