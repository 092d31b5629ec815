//! # Consensus Client Launcher
//!
//! Application service sequencing a launch:
//! plan → substrate (provision + render) → port lookup → readiness → identity.

use std::collections::BTreeSet;
use std::net::IpAddr;

use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};

use super::identity::resolve_identity;
use super::provisioner::ArtifactProvisioner;
use crate::algorithms::{wait_for_availability, LaunchPlan};
use crate::config::LauncherConfig;
use crate::domain::{
    BootstrapPeer, ClientProfile, ConsensusLayerClientContext, ContainerSpec, GenesisArtifacts,
    LaunchParameters, LauncherError, ServiceId, SharedDirectory, TotalTerminalDifficulty,
};
use crate::ports::{
    BeaconClientFactory, ConsensusClientLauncher, ContainerConfigSupplier, OrchestrationSubstrate,
    Sleeper, SubstrateError,
};

/// Launches consensus-layer client nodes on an orchestration substrate.
///
/// Holds no mutable state; one instance can serve concurrent launches.
pub struct ClClientLauncher<S, F, T> {
    substrate: S,
    client_factory: F,
    sleeper: T,
    profile: ClientProfile,
    genesis: GenesisArtifacts,
    config: LauncherConfig,
}

impl<S, F, T> ClClientLauncher<S, F, T>
where
    S: OrchestrationSubstrate,
    F: BeaconClientFactory,
    T: Sleeper,
{
    /// Create a launcher for an arbitrary client profile.
    pub fn new(
        profile: ClientProfile,
        substrate: S,
        client_factory: F,
        sleeper: T,
        genesis: GenesisArtifacts,
        config: LauncherConfig,
    ) -> Self {
        Self {
            substrate,
            client_factory,
            sleeper,
            profile,
            genesis,
            config,
        }
    }

    /// Create a Teku launcher.
    pub fn teku(
        substrate: S,
        client_factory: F,
        sleeper: T,
        genesis: GenesisArtifacts,
        config: LauncherConfig,
    ) -> Self {
        Self::new(ClientProfile::teku(), substrate, client_factory, sleeper, genesis, config)
    }

    /// Client profile in use.
    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    /// Launcher configuration.
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Substrate the launcher submits services to.
    pub fn substrate(&self) -> &S {
        &self.substrate
    }

    fn parameters(
        &self,
        service_id: ServiceId,
        bootstrap_peer: BootstrapPeer,
        el_rpc_sockets: BTreeSet<String>,
        total_terminal_difficulty: TotalTerminalDifficulty,
    ) -> LaunchParameters {
        LaunchParameters {
            service_id,
            bootstrap_peer,
            el_rpc_sockets,
            total_terminal_difficulty,
            genesis: self.genesis.clone(),
        }
    }

    /// The single launch sequence behind both public entry points.
    async fn launch_node(
        &self,
        params: LaunchParameters,
    ) -> Result<ConsensusLayerClientContext, LauncherError> {
        let span = info_span!(
            "launch_node",
            service_id = %params.service_id,
            client = %self.profile.kind(),
            bootstrap = params.bootstrap_peer.is_bootstrap(),
        );

        self.run_launch(params)
            .instrument(span.clone())
            .await
            .inspect_err(|e| {
                span.in_scope(|| warn!(kind = e.kind(), error = %e, "launch failed"));
            })
    }

    async fn run_launch(
        &self,
        params: LaunchParameters,
    ) -> Result<ConsensusLayerClientContext, LauncherError> {
        let service_id = params.service_id.clone();
        info!(el_endpoints = params.el_rpc_sockets.len(), "launching consensus client");

        let plan = LaunchPlan::new(&self.profile, self.config.client.image.as_deref(), &params);
        let supplier = config_supplier(plan, ArtifactProvisioner::new(params.genesis));

        let service = self
            .substrate
            .add_service(&service_id, supplier)
            .await
            .map_err(|e| match e {
                SubstrateError::Supplier(inner) => *inner,
                SubstrateError::Rejected(reason) => LauncherError::Launch {
                    service_id: service_id.clone(),
                    reason,
                },
            })?;
        info!(private_ip = %service.private_ip, "service started");

        let http_port_id = self.profile.http_port_id();
        let http_port = service
            .private_port(http_port_id)
            .ok_or_else(|| LauncherError::PortMismatch {
                service_id: service_id.clone(),
                port_id: http_port_id.to_string(),
                available: service.private_ports.keys().cloned().collect(),
            })?;

        let client = self.client_factory.connect(service.private_ip, http_port.number);

        let policy = self.config.retry_policy();
        let readiness = wait_for_availability(
            &client,
            &policy,
            self.config.readiness.health_check,
            &self.sleeper,
        )
        .await
        .map_err(|exhausted| LauncherError::ReadinessTimeout {
            service_id: service_id.clone(),
            attempts: exhausted.attempts,
            delay: exhausted.delay,
            last_error: exhausted.last_error.to_string(),
        })?;
        info!(
            attempts = readiness.attempts,
            status = ?readiness.value,
            "node is available"
        );

        let identity = resolve_identity(&client)
            .await
            .map_err(|source| LauncherError::IdentityFetch {
                service_id: service_id.clone(),
                source,
            })?;
        info!(enr = %identity.enr, peer_id = %identity.peer_id, "node identity resolved");

        Ok(ConsensusLayerClientContext::new(
            service,
            identity.enr,
            http_port_id.to_string(),
        ))
    }
}

/// Wrap a plan into the supplier the substrate evaluates after scheduling.
///
/// Provisioning runs first so the rendered arguments point at files that
/// already exist in the shared directory.
pub fn config_supplier(
    plan: LaunchPlan,
    provisioner: ArtifactProvisioner,
) -> ContainerConfigSupplier {
    Box::new(
        move |private_ip: IpAddr,
              shared_dir: &SharedDirectory|
              -> Result<ContainerSpec, LauncherError> {
            let artifacts = provisioner.provision(shared_dir)?;
            Ok(plan.container_spec(private_ip, &artifacts))
        },
    )
}

#[async_trait]
impl<S, F, T> ConsensusClientLauncher for ClClientLauncher<S, F, T>
where
    S: OrchestrationSubstrate,
    F: BeaconClientFactory,
    T: Sleeper,
{
    async fn launch_boot_node(
        &self,
        service_id: ServiceId,
        el_rpc_sockets: BTreeSet<String>,
        total_terminal_difficulty: TotalTerminalDifficulty,
    ) -> Result<ConsensusLayerClientContext, LauncherError> {
        let params = self.parameters(
            service_id,
            BootstrapPeer::BootstrapNode,
            el_rpc_sockets,
            total_terminal_difficulty,
        );
        self.launch_node(params).await
    }

    async fn launch_child_node(
        &self,
        service_id: ServiceId,
        boot_enr: &str,
        el_rpc_sockets: BTreeSet<String>,
        total_terminal_difficulty: TotalTerminalDifficulty,
    ) -> Result<ConsensusLayerClientContext, LauncherError> {
        let params = self.parameters(
            service_id,
            BootstrapPeer::from_enr(boot_enr),
            el_rpc_sockets,
            total_terminal_difficulty,
        );
        self.launch_node(params).await
    }
}
