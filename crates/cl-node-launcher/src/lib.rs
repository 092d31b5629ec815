//! # CL Node Launcher
//!
//! Bootstraps a single consensus-layer client node on a container
//! orchestration substrate and hands back a context other components use to
//! address it.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Launch Sequence
//!
//! Every launch runs the same strictly ordered sequence; no step runs if the
//! previous one failed:
//!
//! 1. Build a [`LaunchPlan`] from everything known upfront.
//! 2. Hand the plan's supplier to the substrate. Once the substrate has
//!    scheduled the service it evaluates the supplier, which copies the
//!    genesis artifacts into the shared directory and renders the
//!    [`ContainerSpec`] with the assigned private IP.
//! 3. Resolve the REST API port from the realized port bindings.
//! 4. Poll `/eth/v1/node/health` with a bounded retry budget.
//! 5. Fetch `/eth/v1/node/identity` for the node's ENR.
//! 6. Return a [`ConsensusLayerClientContext`].
//!
//! ## Module Structure
//!
//! ```text
//! cl-node-launcher/
//! ├── domain/          # Launch parameters, port catalog, container spec, errors
//! ├── algorithms/      # Launch configuration builder, bounded retry / readiness poller
//! ├── ports/           # Inbound launcher API + outbound substrate/REST/sleeper traits
//! ├── application/     # ClClientLauncher orchestrating everything, artifact provisioner
//! ├── adapters/        # reqwest beacon client, tokio sleeper, in-memory test doubles
//! └── config.rs        # LauncherConfig (TOML)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cl_node_launcher::{ClClientLauncher, ConsensusClientLauncher, LauncherConfig};
//!
//! let launcher = ClClientLauncher::teku(substrate, client_factory, TokioSleeper, genesis, config);
//! let boot = launcher
//!     .launch_boot_node(ServiceId::new("cl-client-0"), el_sockets.clone(), ttd)
//!     .await?;
//! let child = launcher
//!     .launch_child_node(ServiceId::new("cl-client-1"), boot.enr(), el_sockets, ttd)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{HttpBeaconClient, HttpBeaconClientFactory, TokioSleeper};
pub use algorithms::{
    bounded_retry, wait_for_availability, LaunchPlan, ProbeState, RetryExhausted, RetryOutcome,
    RetryPolicy,
};
pub use application::{resolve_identity, ArtifactProvisioner, ClClientLauncher};
pub use config::{ConfigError, HealthCheckDepth, LauncherConfig};
pub use domain::{
    BootstrapPeer, ClientError, ClientKind, ClientProfile, ConsensusLayerClientContext,
    ContainerSpec, GenesisArtifacts, HealthStatus, LaunchParameters, LauncherError, NodeIdentity,
    PortCatalog, PortProtocol, PortSpec, ProvisionedArtifacts, ServiceContext, ServiceId,
    SharedDirectory, SharedPath, TotalTerminalDifficulty,
};
pub use ports::{
    BeaconClientFactory, BeaconNodeClient, ConsensusClientLauncher, ContainerConfigSupplier,
    OrchestrationSubstrate, Sleeper, SubstrateError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
