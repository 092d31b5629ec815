//! # Domain Errors
//!
//! Error types for the launch sequence.
//!
//! Each variant of [`LauncherError`] maps to exactly one stage of the
//! sequence, so an operator can tell "my genesis file is unreadable" apart
//! from "the container never came up" without re-running with extra logging.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::params::ServiceId;

/// Errors that terminate a single launch.
///
/// None of these are retried by the launcher itself (the readiness poller has
/// its own bounded budget); callers may retry the whole launch.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Copying an input artifact into the shared directory failed.
    #[error(
        "failed to provision {artifact} from '{}' to '{}': {source}",
        source_path.display(),
        destination.display()
    )]
    Provisioning {
        /// Artifact being copied (e.g. "genesis config").
        artifact: &'static str,
        /// Path on the launcher's filesystem.
        source_path: PathBuf,
        /// Path inside the shared directory, launcher-side view.
        destination: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The orchestration substrate rejected or failed to start the container.
    #[error("failed to launch consensus client with service ID '{service_id}': {reason}")]
    Launch {
        /// Service the launch was for.
        service_id: ServiceId,
        /// Reason reported by the substrate.
        reason: String,
    },

    /// The realized port bindings do not contain the control API port.
    ///
    /// The substrate started a container that does not match the declared
    /// port catalog.
    #[error(
        "expected service '{service_id}' to have port with ID '{port_id}', but none was found (available: {available:?})"
    )]
    PortMismatch {
        /// Service that was started.
        service_id: ServiceId,
        /// Symbolic port id that was looked up.
        port_id: String,
        /// Port ids the substrate did report.
        available: Vec<String>,
    },

    /// Health polling exhausted its retry budget.
    #[error(
        "node '{service_id}' didn't become available even after {attempts} attempts with {delay:?} between attempts (last error: {last_error})"
    )]
    ReadinessTimeout {
        /// Service being polled.
        service_id: ServiceId,
        /// Number of health probes sent.
        attempts: u32,
        /// Delay between probes.
        delay: Duration,
        /// Error from the final probe.
        last_error: String,
    },

    /// The node answered health probes but its identity could not be fetched.
    #[error(
        "node '{service_id}' is healthy but fetching its identity (needed for the ENR) failed: {source}"
    )]
    IdentityFetch {
        /// Service being queried.
        service_id: ServiceId,
        /// Underlying REST client failure.
        source: ClientError,
    },
}

impl LauncherError {
    /// Short stable name of the failing stage, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provisioning { .. } => "provisioning",
            Self::Launch { .. } => "launch",
            Self::PortMismatch { .. } => "port_mismatch",
            Self::ReadinessTimeout { .. } => "readiness_timeout",
            Self::IdentityFetch { .. } => "identity_fetch",
        }
    }
}

/// Errors from the beacon node REST client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Could not reach the node.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request did not complete in time.
    #[error("request to {0} timed out")]
    Timeout(String),

    /// The node answered with a status the client does not accept.
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// Endpoint path queried.
        endpoint: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The node was reachable but not in the state the caller requires.
    #[error("node not ready: {0}")]
    NotReady(String),
}
