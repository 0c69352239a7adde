//! Telemetry module
//!
//! Logging and decision-loop metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use self::metrics::{
    MetricsSink, ObservabilitySink, RecordingSink, DECISIONS_TOTAL, MODEL_MODE,
    VOL_RISK_FACTOR, WALK_FORWARD_FITS_TOTAL,
};

use crate::config::TelemetryConfig;

/// Guard held for the lifetime of the process
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    Ok(TelemetryGuard { _priv: () })
}
