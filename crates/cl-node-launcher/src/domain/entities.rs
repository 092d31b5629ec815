//! # Domain Entities
//!
//! Container specification, running service handle, node identity and the
//! client context returned to callers.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::catalog::{PortCatalog, PortSpec};
use super::params::ServiceId;

/// Declarative description of the container to start.
///
/// Built fresh per launch and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    image: String,
    used_ports: PortCatalog,
    cmd_args: Vec<String>,
}

impl ContainerSpec {
    /// Create a container spec.
    pub fn new(image: impl Into<String>, used_ports: PortCatalog, cmd_args: Vec<String>) -> Self {
        Self {
            image: image.into(),
            used_ports,
            cmd_args,
        }
    }

    /// Image reference.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Ports the container exposes.
    pub fn used_ports(&self) -> &PortCatalog {
        &self.used_ports
    }

    /// Command-line override.
    pub fn cmd_args(&self) -> &[String] {
        &self.cmd_args
    }

    /// Value of the first `--flag=value` argument, if present.
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.cmd_args
            .iter()
            .find_map(|arg| arg.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')))
    }

    /// Whether any argument starts with `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.cmd_args.iter().any(|arg| arg.starts_with(flag))
    }
}

/// Handle to a service the substrate started.
///
/// Only the substrate constructs these; the launcher just reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContext {
    /// Service identifier.
    pub service_id: ServiceId,
    /// Address reachable from inside the substrate's network.
    pub private_ip: IpAddr,
    /// Realized port bindings by symbolic id.
    pub private_ports: BTreeMap<String, PortSpec>,
}

impl ServiceContext {
    /// Realized binding for a symbolic port id.
    pub fn private_port(&self, id: &str) -> Option<PortSpec> {
        self.private_ports.get(id).copied()
    }
}

/// Result of `/eth/v1/node/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// 200: node is ready.
    Ready,
    /// 206: node is up but still syncing.
    Syncing,
}

/// `data` object of `/eth/v1/node/identity`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeIdentity {
    /// libp2p peer id.
    #[serde(default)]
    pub peer_id: String,
    /// Ethereum Node Record.
    pub enr: String,
    /// Multiaddrs for libp2p.
    #[serde(default)]
    pub p2p_addresses: Vec<String>,
    /// Multiaddrs for discv5.
    #[serde(default)]
    pub discovery_addresses: Vec<String>,
}

impl NodeIdentity {
    /// Identity carrying only an ENR.
    pub fn from_enr(enr: impl Into<String>) -> Self {
        Self {
            enr: enr.into(),
            ..Self::default()
        }
    }
}

/// A launched, healthy and addressable consensus client.
///
/// Constructed only after a successful readiness check and identity fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusLayerClientContext {
    service: ServiceContext,
    enr: String,
    http_port_id: String,
}

impl ConsensusLayerClientContext {
    pub(crate) fn new(service: ServiceContext, enr: String, http_port_id: String) -> Self {
        Self {
            service,
            enr,
            http_port_id,
        }
    }

    /// Underlying service handle.
    pub fn service(&self) -> &ServiceContext {
        &self.service
    }

    /// Node's ENR, for child nodes to bootstrap from.
    pub fn enr(&self) -> &str {
        &self.enr
    }

    /// Symbolic id of the REST API port.
    pub fn http_port_id(&self) -> &str {
        &self.http_port_id
    }

    /// `http://<private ip>:<rest port>`.
    ///
    /// `None` only if the realized ports lack the REST port, which the
    /// launcher rules out before building a context.
    pub fn rest_api_url(&self) -> Option<String> {
        let port = self.service.private_port(&self.http_port_id)?;
        Some(match self.service.private_ip {
            IpAddr::V4(ip) => format!("http://{}:{}", ip, port.number),
            IpAddr::V6(ip) => format!("http://[{}]:{}", ip, port.number),
        })
    }
}
