//! # Launch Parameters
//!
//! Immutable input to a single launch.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use primitive_types::U256;

/// Merge terminal total difficulty. Realistic values exceed `u64::MAX`.
pub type TotalTerminalDifficulty = U256;

/// Identifier the substrate registers the service under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(String);

impl ServiceId {
    /// Wrap a service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether the node starts a network or joins one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapPeer {
    /// First node in the network; no peer to dial.
    BootstrapNode,
    /// Joins the network through the node publishing this ENR.
    ChildNode(String),
}

impl BootstrapPeer {
    /// Map an ENR string onto a variant. The empty string means "bootstrap node".
    pub fn from_enr(enr: impl Into<String>) -> Self {
        let enr = enr.into();
        if enr.is_empty() {
            Self::BootstrapNode
        } else {
            Self::ChildNode(enr)
        }
    }

    /// ENR to dial, if any.
    pub fn enr(&self) -> Option<&str> {
        match self {
            Self::BootstrapNode => None,
            Self::ChildNode(enr) => Some(enr),
        }
    }

    /// Whether this is the first node in the network.
    pub fn is_bootstrap(&self) -> bool {
        matches!(self, Self::BootstrapNode)
    }
}

/// Genesis inputs on the launcher's filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisArtifacts {
    /// Network/genesis config YAML.
    pub config_yml: PathBuf,
    /// Genesis state SSZ snapshot.
    pub state_ssz: PathBuf,
}

impl GenesisArtifacts {
    /// Create from the two local paths.
    pub fn new(config_yml: impl Into<PathBuf>, state_ssz: impl Into<PathBuf>) -> Self {
        Self {
            config_yml: config_yml.into(),
            state_ssz: state_ssz.into(),
        }
    }
}

/// Everything a single launch needs before the substrate schedules it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParameters {
    /// Service to register.
    pub service_id: ServiceId,
    /// Bootstrap or child.
    pub bootstrap_peer: BootstrapPeer,
    /// Execution-layer RPC sockets (`host:port`), ordered for determinism.
    pub el_rpc_sockets: BTreeSet<String>,
    /// Merge terminal total difficulty.
    pub total_terminal_difficulty: TotalTerminalDifficulty,
    /// Genesis inputs to provision.
    pub genesis: GenesisArtifacts,
}
