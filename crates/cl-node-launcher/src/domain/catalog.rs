//! # Port Catalog and Client Profiles
//!
//! Static description of the ports each client type exposes, keyed by
//! [`ClientKind`]. The table is immutable and passed explicitly to the
//! launch configuration builder.

use std::collections::BTreeMap;
use std::fmt;

/// Transport protocol of an exposed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// A port number plus its transport protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortSpec {
    /// Port number.
    pub number: u16,
    /// Transport protocol.
    pub protocol: PortProtocol,
}

impl PortSpec {
    /// Create a port spec.
    pub const fn new(number: u16, protocol: PortProtocol) -> Self {
        Self { number, protocol }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.protocol)
    }
}

/// Symbolic port name → port spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortCatalog {
    ports: BTreeMap<String, PortSpec>,
}

impl PortCatalog {
    /// Build a catalog from `(id, spec)` pairs.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, PortSpec)>,
        K: Into<String>,
    {
        Self {
            ports: entries.into_iter().map(|(id, spec)| (id.into(), spec)).collect(),
        }
    }

    /// Look up a port by symbolic id.
    pub fn get(&self, id: &str) -> Option<PortSpec> {
        self.ports.get(id).copied()
    }

    /// Iterate over `(id, spec)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PortSpec)> {
        self.ports.iter().map(|(id, spec)| (id.as_str(), *spec))
    }

    /// Number of declared ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether no ports are declared.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, PortSpec> {
        &self.ports
    }
}

/// Consensus client implementations the launcher knows how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// ConsenSys Teku
    Teku,
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teku => write!(f, "teku"),
        }
    }
}

/// Teku port ids and numbers.
pub mod teku {
    /// Default container image.
    pub const IMAGE: &str = "consensys/teku:latest";
    /// Data directory inside the container.
    pub const DATA_DIR: &str = "/consensus-data";

    /// Discovery over TCP.
    pub const TCP_DISCOVERY_PORT_ID: &str = "tcp-discovery";
    /// Discovery over UDP.
    pub const UDP_DISCOVERY_PORT_ID: &str = "udp-discovery";
    /// Beacon REST API.
    pub const HTTP_PORT_ID: &str = "http";

    /// Shared by TCP and UDP discovery.
    pub const DISCOVERY_PORT_NUM: u16 = 9000;
    /// Beacon REST API port.
    pub const HTTP_PORT_NUM: u16 = 4000;
}

/// Everything about a client type that does not vary per launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    kind: ClientKind,
    default_image: String,
    ports: PortCatalog,
    http_port_id: String,
    http_port: PortSpec,
    data_dir: String,
}

impl ClientProfile {
    /// Profile for the given client kind.
    pub fn for_kind(kind: ClientKind) -> Self {
        match kind {
            ClientKind::Teku => Self::teku(),
        }
    }

    /// Teku profile.
    pub fn teku() -> Self {
        // TODO: declare the metrics port once the launcher wires up scraping.
        let http_port = PortSpec::new(teku::HTTP_PORT_NUM, PortProtocol::Tcp);
        let ports = PortCatalog::from_entries([
            (
                teku::TCP_DISCOVERY_PORT_ID,
                PortSpec::new(teku::DISCOVERY_PORT_NUM, PortProtocol::Tcp),
            ),
            (
                teku::UDP_DISCOVERY_PORT_ID,
                PortSpec::new(teku::DISCOVERY_PORT_NUM, PortProtocol::Udp),
            ),
            (teku::HTTP_PORT_ID, http_port),
        ]);

        Self {
            kind: ClientKind::Teku,
            default_image: teku::IMAGE.to_string(),
            ports,
            http_port_id: teku::HTTP_PORT_ID.to_string(),
            http_port,
            data_dir: teku::DATA_DIR.to_string(),
        }
    }

    /// Which client this profile describes.
    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    /// Image used when the config does not override it.
    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Ports the container exposes.
    pub fn ports(&self) -> &PortCatalog {
        &self.ports
    }

    /// Symbolic id of the REST API port.
    pub fn http_port_id(&self) -> &str {
        &self.http_port_id
    }

    /// Declared REST API port; always an entry of [`Self::ports`].
    pub fn http_port(&self) -> PortSpec {
        self.http_port
    }

    /// Data directory inside the container.
    pub fn data_dir(&self) -> &str {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teku_profile_ports() {
        let profile = ClientProfile::for_kind(ClientKind::Teku);
        assert_eq!(profile.ports().len(), 3);
        assert_eq!(
            profile.ports().get("tcp-discovery"),
            Some(PortSpec::new(9000, PortProtocol::Tcp))
        );
        assert_eq!(
            profile.ports().get("udp-discovery"),
            Some(PortSpec::new(9000, PortProtocol::Udp))
        );
        assert_eq!(profile.http_port(), PortSpec::new(4000, PortProtocol::Tcp));
        assert_eq!(profile.ports().get(profile.http_port_id()), Some(profile.http_port()));
    }

    #[test]
    fn test_teku_profile_is_stable() {
        assert_eq!(ClientProfile::teku(), ClientProfile::teku());
    }

    #[test]
    fn test_port_spec_display() {
        assert_eq!(PortSpec::new(9000, PortProtocol::Udp).to_string(), "9000/UDP");
    }

    #[test]
    fn test_catalog_iterates_in_id_order() {
        let ids: Vec<_> = ClientProfile::teku()
            .ports()
            .iter()
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(ids, vec!["http", "tcp-discovery", "udp-discovery"]);
    }
}
