//! # Launcher Telemetry
//!
//! Structured logging for the CL node launcher and the tools built on it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use launcher_telemetry::{init_tracing, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `cl-node-launcher` | Service name in the startup event |
//! | `LAUNCHER_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LAUNCHER_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `LAUNCHER_CONSOLE_OUTPUT` | `true` | Write events to stdout at all |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log level string is not a valid filter directive.
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter {
        /// Directive that failed to parse.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "cl-node-launcher");
    }
}
