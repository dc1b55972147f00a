//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration for a node process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log filter directive (e.g. `info` or `info,nx_dual_approval=debug`)
    pub log_level: String,

    /// Whether to write to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "nexus-node".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `NX_SERVICE_NAME`: Service name (default: nexus-node)
    /// - `NX_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `NX_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `NX_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `NX_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("NX_SERVICE_NAME").unwrap_or_else(|| "nexus-node".to_string()),

            log_level: lookup("NX_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            console_output: lookup("NX_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: lookup("NX_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: lookup("NX_NETWORK").unwrap_or_else(|| "testnet".to_string()),
        }
    }
}
