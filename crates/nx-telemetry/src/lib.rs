//! # Nexus Telemetry
//!
//! Logging bootstrap shared by every Nexus binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nx_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NX_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `NX_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `NX_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `NX_SERVICE_NAME` | `nexus-node` | Service name |
//! | `NX_NETWORK` | `testnet` | Network name |
//!
//! Library crates only emit `tracing` events; installing the subscriber is
//! left to the binary.

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
