//! # Launcher Configuration
//!
//! Tunables that do not change per launch: image override, readiness retry
//! budget and REST client timeouts.
//!
//! # Config File Format
//!
//! ```toml
//! [client]
//! image = "consensys/teku:latest"
//!
//! [readiness]
//! max_attempts = 10
//! retry_delay_ms = 1000
//! health_check = "shallow"    # or "require_ready"
//!
//! [rest_client]
//! request_timeout_ms = 5000
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::RetryPolicy;
use crate::domain::HealthStatus;

/// Retry attempts used by the original launcher.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Delay between health probes used by the original launcher.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
/// Per-request REST timeout.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// How much of a health response the readiness poller inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCheckDepth {
    /// Any successful response counts, including "syncing".
    #[default]
    Shallow,
    /// Only a "ready" response counts.
    RequireReady,
}

impl HealthCheckDepth {
    /// Whether `status` ends the readiness wait.
    pub fn accepts(self, status: HealthStatus) -> bool {
        match self {
            Self::Shallow => true,
            Self::RequireReady => status == HealthStatus::Ready,
        }
    }
}

/// Client image settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Image override; the client profile's default when `None`.
    pub image: Option<String>,
}

/// Readiness poller settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Health probes before giving up.
    pub max_attempts: u32,
    /// Delay between probes in milliseconds.
    pub retry_delay_ms: u64,
    /// Response inspection depth.
    pub health_check: HealthCheckDepth,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            health_check: HealthCheckDepth::Shallow,
        }
    }
}

/// Beacon REST client settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestClientConfig {
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Launcher configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Client image settings.
    pub client: ClientConfig,
    /// Readiness poller settings.
    pub readiness: ReadinessConfig,
    /// REST client settings.
    pub rest_client: RestClientConfig,
}

impl LauncherConfig {
    /// Small values for tests.
    pub fn for_testing() -> Self {
        Self {
            client: ClientConfig::default(),
            readiness: ReadinessConfig {
                max_attempts: 3,
                retry_delay_ms: 10,
                health_check: HealthCheckDepth::Shallow,
            },
            rest_client: RestClientConfig {
                request_timeout_ms: 500,
            },
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the launcher cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.readiness.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "readiness.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.client.image.as_deref() == Some("") {
            return Err(ConfigError::Invalid("client.image must not be empty".to_string()));
        }
        Ok(())
    }

    /// Retry policy for the readiness poller.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.readiness.max_attempts,
            Duration::from_millis(self.readiness.retry_delay_ms),
        )
    }

    /// Per-request REST timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.rest_client.request_timeout_ms)
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Parsed but unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}
