//! # Readiness Poller
//!
//! Blocks the launch until the node answers a health probe, or gives up
//! after the retry budget.
//!
//! ```text
//! Probing(1) --fail--> Probing(2) --fail--> ... --fail--> Exhausted
//!      \                    \
//!       `--ok--> Ready       `--ok--> Ready
//! ```
//!
//! With [`HealthCheckDepth::Shallow`] the poller does not look at the
//! reported status: any answer that is not an error means ready.

use std::fmt;

use tracing::debug;

use super::retry::{bounded_retry, RetryExhausted, RetryOutcome, RetryPolicy};
use crate::config::HealthCheckDepth;
use crate::domain::{ClientError, HealthStatus};
use crate::ports::{BeaconNodeClient, Sleeper};

/// Observable state of the readiness poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// Waiting on the given 1-based attempt.
    Probing {
        /// Attempt in flight.
        attempt: u32,
    },
    /// A probe succeeded. Terminal.
    Ready,
    /// The budget was spent. Terminal.
    Exhausted,
}

impl ProbeState {
    /// Initial state.
    pub fn initial() -> Self {
        Self::Probing { attempt: 1 }
    }

    /// State after a probe result.
    pub fn after_probe(self, succeeded: bool, max_attempts: u32) -> Self {
        match self {
            Self::Probing { .. } if succeeded => Self::Ready,
            Self::Probing { attempt } if attempt >= max_attempts => Self::Exhausted,
            Self::Probing { attempt } => Self::Probing {
                attempt: attempt + 1,
            },
            terminal => terminal,
        }
    }

    /// Whether no further transitions happen.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Probing { .. })
    }
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probing { attempt } => write!(f, "probing(attempt {attempt})"),
            Self::Ready => write!(f, "ready"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Poll `client` until its health probe is accepted by `depth`.
///
/// # Errors
///
/// Returns [`RetryExhausted`] carrying the final probe's error when every
/// attempt failed.
pub async fn wait_for_availability<C, S>(
    client: &C,
    policy: &RetryPolicy,
    depth: HealthCheckDepth,
    sleeper: &S,
) -> Result<RetryOutcome<HealthStatus>, RetryExhausted<ClientError>>
where
    C: BeaconNodeClient + ?Sized,
    S: Sleeper + ?Sized,
{
    let max_attempts = policy.max_attempts();

    bounded_retry(policy, sleeper, move |attempt| async move {
        let result = probe(client, depth).await;
        let next = ProbeState::Probing { attempt }.after_probe(result.is_ok(), max_attempts);
        match &result {
            Ok(status) => debug!(attempt, ?status, state = %next, "health probe succeeded"),
            Err(e) => debug!(attempt, error = %e, state = %next, "health probe failed"),
        }
        result
    })
    .await
}

async fn probe<C>(client: &C, depth: HealthCheckDepth) -> Result<HealthStatus, ClientError>
where
    C: BeaconNodeClient + ?Sized,
{
    let status = client.get_health().await?;
    if depth.accepts(status) {
        Ok(status)
    } else {
        Err(ClientError::NotReady(format!("health status {status:?}")))
    }
}
