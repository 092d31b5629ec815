//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the launcher requires from its environment: the orchestration
//! substrate, the beacon node REST client and a timer.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    ClientError, ContainerSpec, HealthStatus, LauncherError, NodeIdentity, ServiceContext,
    ServiceId, SharedDirectory,
};

/// Renders the container spec once the substrate knows the service's private
/// IP and shared directory.
///
/// Evaluated exactly once, by the substrate, after scheduling.
pub type ContainerConfigSupplier =
    Box<dyn FnOnce(IpAddr, &SharedDirectory) -> Result<ContainerSpec, LauncherError> + Send>;

/// Errors from [`OrchestrationSubstrate::add_service`].
#[derive(Debug, Error)]
pub enum SubstrateError {
    /// The config supplier failed; carries its error unchanged.
    #[error("container config supplier failed: {0}")]
    Supplier(Box<LauncherError>),

    /// The substrate refused or failed to start the container.
    #[error("substrate rejected service: {0}")]
    Rejected(String),
}

/// Container orchestration substrate.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; callers may run several launches
/// concurrently against one substrate.
#[async_trait]
pub trait OrchestrationSubstrate: Send + Sync {
    /// Schedule a service, evaluate `supplier` with its assigned IP and
    /// shared directory, then start the resulting container.
    async fn add_service(
        &self,
        service_id: &ServiceId,
        supplier: ContainerConfigSupplier,
    ) -> Result<ServiceContext, SubstrateError>;
}

/// Beacon node REST client.
#[async_trait]
pub trait BeaconNodeClient: Send + Sync {
    /// `GET /eth/v1/node/health`.
    async fn get_health(&self) -> Result<HealthStatus, ClientError>;

    /// `GET /eth/v1/node/identity`.
    async fn get_node_identity(&self) -> Result<NodeIdentity, ClientError>;
}

/// Builds a [`BeaconNodeClient`] bound to an address known only after launch.
pub trait BeaconClientFactory: Send + Sync {
    /// Client type produced.
    type Client: BeaconNodeClient;

    /// Bind a client to `ip:port`.
    fn connect(&self, ip: IpAddr, port: u16) -> Self::Client;
}

/// Abstract delay, so retry loops can be tested without real waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrate_error_display() {
        let err = SubstrateError::Rejected("image pull failed".to_string());
        assert_eq!(err.to_string(), "substrate rejected service: image pull failed");
    }

    #[test]
    fn test_supplier_error_keeps_inner_message() {
        let err = SubstrateError::Supplier(Box::new(LauncherError::Launch {
            service_id: ServiceId::new("cl-client-0"),
            reason: "boom".to_string(),
        }));
        assert!(err.to_string().contains("boom"));
    }
}
