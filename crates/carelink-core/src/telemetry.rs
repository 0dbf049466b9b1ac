//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the configured level when present.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::CarelinkResult;
use serde::{Deserialize, Serialize};

/// Default directive set when neither `RUST_LOG` nor a level is configured.
pub const DEFAULT_FILTER: &str = "info,carelink=debug,tower_http=debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Base level for the `carelink` targets, e.g. `debug`.
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_service_name() -> String {
    "carelink-network".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: None,
            log_format: LogFormat::default(),
        }
    }
}

impl TelemetryConfig {
    /// Returns the filter directives used when `RUST_LOG` is unset.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        match &self.log_level {
            Some(level) => format!("info,carelink={level},tower_http={level}"),
            None => DEFAULT_FILTER.to_string(),
        }
    }
}

/// Installs the global tracing subscriber.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> CarelinkResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };
    result.map_err(|e| {
        crate::CarelinkError::Configuration(format!("Failed to install tracing subscriber: {e}"))
    })?;

    tracing::info!(
        service_name = %config.service_name,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(())
}

/// No-op when the subscriber is not compiled in.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_config: &TelemetryConfig) -> CarelinkResult<()> {
    Ok(())
}
