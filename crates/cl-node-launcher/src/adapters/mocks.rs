//! In-memory test doubles for the outbound ports.
//!
//! Used by the crate's own tests and by integration tests of callers that
//! assemble networks on top of the launcher.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    ClientError, ContainerSpec, HealthStatus, NodeIdentity, PortSpec, ServiceContext, ServiceId,
    SharedDirectory,
};
use crate::ports::{
    BeaconClientFactory, BeaconNodeClient, ContainerConfigSupplier, OrchestrationSubstrate,
    Sleeper, SubstrateError,
};

/// Mount point of the shared directory inside mock services.
pub const MOCK_SHARED_MOUNT: &str = "/shared";

const FIRST_HOST: u32 = 2;
const LAST_HOST: u32 = 254;

// ============================================================================
// InMemorySubstrate
// ============================================================================

/// Substrate that "starts" services by evaluating their supplier.
///
/// Assigns private IPs `172.16.0.2` through `172.16.0.254` in launch order
/// and gives each service its own shared directory under `shared_root`.
/// Launches past the end of that range are rejected.
pub struct InMemorySubstrate {
    shared_root: PathBuf,
    next_host: AtomicU32,
    realized_ports: Option<BTreeMap<String, PortSpec>>,
    rejection: Option<String>,
    launched: Mutex<Vec<(ServiceId, ContainerSpec)>>,
}

impl InMemorySubstrate {
    /// Substrate writing shared directories below `shared_root`.
    pub fn new(shared_root: impl Into<PathBuf>) -> Self {
        Self {
            shared_root: shared_root.into(),
            next_host: AtomicU32::new(FIRST_HOST),
            realized_ports: None,
            rejection: None,
            launched: Mutex::new(Vec::new()),
        }
    }

    /// Report these bindings instead of mirroring the container's declared ports.
    pub fn with_realized_ports(mut self, ports: BTreeMap<String, PortSpec>) -> Self {
        self.realized_ports = Some(ports);
        self
    }

    /// Fail every `add_service` with this reason, without evaluating suppliers.
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.rejection = Some(reason.into());
        self
    }

    /// Launcher-side shared directory for a service.
    pub fn shared_dir_for(&self, service_id: &ServiceId) -> SharedDirectory {
        SharedDirectory::new(
            self.shared_root.join(service_id.as_str()),
            Path::new(MOCK_SHARED_MOUNT),
        )
    }

    /// Specs started so far, in order.
    pub fn launched(&self) -> Vec<(ServiceId, ContainerSpec)> {
        self.launched.lock().clone()
    }

    /// Most recently started spec.
    pub fn last_spec(&self) -> Option<ContainerSpec> {
        self.launched.lock().last().map(|(_, spec)| spec.clone())
    }
}

#[async_trait]
impl OrchestrationSubstrate for InMemorySubstrate {
    async fn add_service(
        &self,
        service_id: &ServiceId,
        supplier: ContainerConfigSupplier,
    ) -> Result<ServiceContext, SubstrateError> {
        if let Some(reason) = &self.rejection {
            return Err(SubstrateError::Rejected(reason.clone()));
        }

        let host = self.next_host.fetch_add(1, Ordering::SeqCst);
        let host = u8::try_from(host)
            .ok()
            .filter(|h| u32::from(*h) <= LAST_HOST)
            .ok_or_else(|| SubstrateError::Rejected("private IP pool exhausted".to_string()))?;
        let private_ip = IpAddr::V4(Ipv4Addr::new(172, 16, 0, host));
        let shared_dir = self.shared_dir_for(service_id);

        let spec = supplier(private_ip, &shared_dir)
            .map_err(|e| SubstrateError::Supplier(Box::new(e)))?;

        let private_ports = self
            .realized_ports
            .clone()
            .unwrap_or_else(|| spec.used_ports().as_map().clone());

        self.launched.lock().push((service_id.clone(), spec));

        Ok(ServiceContext {
            service_id: service_id.clone(),
            private_ip,
            private_ports,
        })
    }
}

// ============================================================================
// ScriptedBeaconClient
// ============================================================================

/// Beacon client whose health probe fails a fixed number of times.
///
/// Clones share call counters, so a factory can hand out clones while the
/// test keeps one to inspect.
#[derive(Debug, Clone)]
pub struct ScriptedBeaconClient {
    health_failures: u32,
    health_status: HealthStatus,
    identity: Result<NodeIdentity, ClientError>,
    health_calls: Arc<AtomicU32>,
    identity_calls: Arc<AtomicU32>,
}

impl ScriptedBeaconClient {
    /// Healthy on the first probe, identity `enr:-mock`.
    pub fn healthy() -> Self {
        Self::failing_health(0)
    }

    /// Fails the first `failures` health probes, then reports ready.
    pub fn failing_health(failures: u32) -> Self {
        Self {
            health_failures: failures,
            health_status: HealthStatus::Ready,
            identity: Ok(NodeIdentity::from_enr("enr:-mock")),
            health_calls: Arc::new(AtomicU32::new(0)),
            identity_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Status reported once probes stop failing.
    pub fn with_health_status(mut self, status: HealthStatus) -> Self {
        self.health_status = status;
        self
    }

    /// Identity returned by `get_node_identity`.
    pub fn with_identity(mut self, identity: NodeIdentity) -> Self {
        self.identity = Ok(identity);
        self
    }

    /// Make `get_node_identity` fail.
    pub fn with_identity_error(mut self, error: ClientError) -> Self {
        self.identity = Err(error);
        self
    }

    /// Health probes received.
    pub fn health_calls(&self) -> u32 {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Identity requests received.
    pub fn identity_calls(&self) -> u32 {
        self.identity_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BeaconNodeClient for ScriptedBeaconClient {
    async fn get_health(&self) -> Result<HealthStatus, ClientError> {
        let previous = self.health_calls.fetch_add(1, Ordering::SeqCst);
        if previous < self.health_failures {
            return Err(ClientError::Connection("connection refused".to_string()));
        }
        Ok(self.health_status)
    }

    async fn get_node_identity(&self) -> Result<NodeIdentity, ClientError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.identity.clone()
    }
}

/// Factory handing out clones of one [`ScriptedBeaconClient`].
#[derive(Debug, Clone)]
pub struct ScriptedClientFactory {
    client: ScriptedBeaconClient,
    connections: Arc<Mutex<Vec<(IpAddr, u16)>>>,
}

impl ScriptedClientFactory {
    /// Factory for `client`.
    pub fn new(client: ScriptedBeaconClient) -> Self {
        Self {
            client,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Addresses clients were bound to, in order.
    pub fn connections(&self) -> Vec<(IpAddr, u16)> {
        self.connections.lock().clone()
    }
}

impl BeaconClientFactory for ScriptedClientFactory {
    type Client = ScriptedBeaconClient;

    fn connect(&self, ip: IpAddr, port: u16) -> Self::Client {
        self.connections.lock().push((ip, port));
        self.client.clone()
    }
}

// ============================================================================
// RecordingSleeper
// ============================================================================

/// Sleeper that returns immediately and records virtual elapsed time.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Fresh sleeper with no recorded time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sleeps requested.
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Sum of all requested sleeps.
    pub fn elapsed(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LauncherError, PortCatalog, PortProtocol};

    #[tokio::test]
    async fn test_scripted_client_fails_then_succeeds() {
        let client = ScriptedBeaconClient::failing_health(2);
        assert!(client.get_health().await.is_err());
        assert!(client.get_health().await.is_err());
        assert_eq!(client.get_health().await, Ok(HealthStatus::Ready));
        assert_eq!(client.clone().health_calls(), 3);
    }

    #[tokio::test]
    async fn test_substrate_assigns_sequential_ips() {
        let tmp = tempfile::tempdir().unwrap();
        let substrate = InMemorySubstrate::new(tmp.path());
        let ports = PortCatalog::from_entries([("http", PortSpec::new(4000, PortProtocol::Tcp))]);

        for expected in [2u8, 3] {
            let ports = ports.clone();
            let supplier: ContainerConfigSupplier = Box::new(
                move |_ip: IpAddr, _dir: &SharedDirectory| -> Result<ContainerSpec, LauncherError> {
                    Ok(ContainerSpec::new("img", ports, Vec::new()))
                },
            );
            let ctx = substrate
                .add_service(&ServiceId::new(format!("svc-{expected}")), supplier)
                .await
                .unwrap();
            assert_eq!(ctx.private_ip, IpAddr::V4(Ipv4Addr::new(172, 16, 0, expected)));
            assert_eq!(ctx.private_port("http"), Some(PortSpec::new(4000, PortProtocol::Tcp)));
        }
        assert_eq!(substrate.launched().len(), 2);
    }

    #[tokio::test]
    async fn test_substrate_rejects_once_address_pool_is_spent() {
        let tmp = tempfile::tempdir().unwrap();
        let substrate = InMemorySubstrate::new(tmp.path());
        let supplier = || -> ContainerConfigSupplier {
            Box::new(
                |_ip: IpAddr, _dir: &SharedDirectory| -> Result<ContainerSpec, LauncherError> {
                    Ok(ContainerSpec::new("img", PortCatalog::default(), Vec::new()))
                },
            )
        };

        let mut last = None;
        for n in FIRST_HOST..=LAST_HOST {
            let ctx = substrate
                .add_service(&ServiceId::new(format!("svc-{n}")), supplier())
                .await
                .unwrap();
            last = Some(ctx.private_ip);
        }
        assert_eq!(last, Some(IpAddr::V4(Ipv4Addr::new(172, 16, 0, 254))));

        let err = substrate
            .add_service(&ServiceId::new("svc-overflow"), supplier())
            .await
            .unwrap_err();
        assert!(matches!(err, SubstrateError::Rejected(_)));
        assert_eq!(substrate.launched().len(), 253);
    }

    #[tokio::test]
    async fn test_recording_sleeper_sums() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_millis(5)).await;
        sleeper.sleep(Duration::from_millis(7)).await;
        assert_eq!(sleeper.sleep_count(), 2);
        assert_eq!(sleeper.elapsed(), Duration::from_millis(12));
    }
}
