//! Configuration management for Kite Core

use anyhow::Result;
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name used in logs and diagnostics
    pub service_name: String,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log output format: "pretty" or "json"
    pub log_format: String,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            log_filter: "kite_core=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "kite-core".to_string()),
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                log_filter: env::var("LOG_FILTER")
                    .unwrap_or_else(|_| "kite_core=info".to_string()),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "kite-core".to_string(),
            telemetry: TelemetryConfig::default(),
        }
    }
}
