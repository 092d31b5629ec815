//! # Launch Configuration Builder
//!
//! Turns launch parameters into the container spec for a Teku beacon node.
//!
//! Construction is split in two phases because the private IP is assigned by
//! the substrate during scheduling:
//!
//! 1. [`LaunchPlan::new`] captures everything known upfront.
//! 2. [`LaunchPlan::container_spec`] renders the spec once the IP and the
//!    provisioned artifact paths are known.
//!
//! Both phases are pure.
//!
//! ## Trust Assumption
//!
//! The REST API is bound to `0.0.0.0` with a `*` host allowlist. The
//! substrate's network is an isolated test network; these nodes must never be
//! reachable from a public interface.

use std::net::IpAddr;

use crate::domain::{
    BootstrapPeer, ClientProfile, ContainerSpec, LaunchParameters, PortCatalog,
    ProvisionedArtifacts, TotalTerminalDifficulty,
};

/// Flag carrying the bootstrap ENR for child nodes.
pub const BOOTNODES_FLAG: &str = "--p2p-discovery-bootnodes";
/// Execution-engine endpoint flag.
pub const EE_ENDPOINT_FLAG: &str = "--Xee-endpoint";
/// Legacy eth1 endpoints flag; carries the same value as [`EE_ENDPOINT_FLAG`].
pub const ETH1_ENDPOINTS_FLAG: &str = "--eth1-endpoints";
/// Merge terminal total difficulty flag.
pub const TTD_FLAG: &str = "--Xnetwork-merge-total-terminal-difficulty";

/// Everything about a launch that is known before scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    image: String,
    used_ports: PortCatalog,
    rest_api_port: u16,
    data_dir: String,
    el_rpc_urls: String,
    total_terminal_difficulty: TotalTerminalDifficulty,
    bootstrap_peer: BootstrapPeer,
}

impl LaunchPlan {
    /// Capture the upfront part of a launch.
    ///
    /// `image` overrides the profile's default image when set.
    pub fn new(profile: &ClientProfile, image: Option<&str>, params: &LaunchParameters) -> Self {
        Self {
            image: image.unwrap_or(profile.default_image()).to_string(),
            used_ports: profile.ports().clone(),
            rest_api_port: profile.http_port().number,
            data_dir: profile.data_dir().to_string(),
            el_rpc_urls: el_rpc_urls(params.el_rpc_sockets.iter().map(String::as_str)),
            total_terminal_difficulty: params.total_terminal_difficulty,
            bootstrap_peer: params.bootstrap_peer.clone(),
        }
    }

    /// Image the container will run.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Comma-joined execution-layer URLs.
    pub fn el_rpc_urls(&self) -> &str {
        &self.el_rpc_urls
    }

    /// Bootstrap or child.
    pub fn bootstrap_peer(&self) -> &BootstrapPeer {
        &self.bootstrap_peer
    }

    /// Render the container spec for a scheduled service.
    ///
    /// Deterministic: identical inputs produce identical argument lists.
    pub fn container_spec(
        &self,
        private_ip: IpAddr,
        artifacts: &ProvisionedArtifacts,
    ) -> ContainerSpec {
        let mut cmd_args = vec![
            format!("--network={}", artifacts.genesis_config_yml.display()),
            format!("--initial-state={}", artifacts.genesis_state_ssz.display()),
            format!("--data-path={}", self.data_dir),
            "--data-storage-mode=PRUNE".to_string(),
            "--p2p-enabled=true".to_string(),
            format!("{}={}", ETH1_ENDPOINTS_FLAG, self.el_rpc_urls),
            format!("{}={}", EE_ENDPOINT_FLAG, self.el_rpc_urls),
            format!("--p2p-advertised-ip={private_ip}"),
            "--rest-api-enabled=true".to_string(),
            "--rest-api-docs-enabled=true".to_string(),
            "--rest-api-interface=0.0.0.0".to_string(),
            format!("--rest-api-port={}", self.rest_api_port),
            "--rest-api-host-allowlist=*".to_string(),
            "--Xdata-storage-non-canonical-blocks-enabled=true".to_string(),
            format!("{}={}", TTD_FLAG, self.total_terminal_difficulty),
            "--log-destination=CONSOLE".to_string(),
        ];
        if let BootstrapPeer::ChildNode(enr) = &self.bootstrap_peer {
            cmd_args.push(format!("{BOOTNODES_FLAG}={enr}"));
        }

        ContainerSpec::new(self.image.clone(), self.used_ports.clone(), cmd_args)
    }
}

/// Prefix each `host:port` socket with `http://` and join with commas.
pub fn el_rpc_urls<'a>(sockets: impl IntoIterator<Item = &'a str>) -> String {
    sockets
        .into_iter()
        .map(|socket| format!("http://{socket}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenesisArtifacts, ServiceId};
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    fn params(bootstrap_peer: BootstrapPeer, sockets: &[&str]) -> LaunchParameters {
        LaunchParameters {
            service_id: ServiceId::new("cl-client-0"),
            bootstrap_peer,
            el_rpc_sockets: sockets.iter().map(|s| s.to_string()).collect(),
            total_terminal_difficulty: TotalTerminalDifficulty::from_dec_str(
                "58750000000000000000",
            )
            .unwrap(),
            genesis: GenesisArtifacts::new("/static/genesis-config.yml", "/static/genesis.ssz"),
        }
    }

    fn artifacts() -> ProvisionedArtifacts {
        ProvisionedArtifacts {
            genesis_config_yml: PathBuf::from("/shared/genesis-config.yml"),
            genesis_state_ssz: PathBuf::from("/shared/genesis.ssz"),
        }
    }

    fn ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(172, 16, 0, 7))
    }

    fn render(peer: BootstrapPeer, sockets: &[&str]) -> ContainerSpec {
        LaunchPlan::new(&ClientProfile::teku(), None, &params(peer, sockets))
            .container_spec(ip(), &artifacts())
    }

    #[test]
    fn test_boot_node_full_argument_list() {
        let spec = render(BootstrapPeer::BootstrapNode, &["10.0.0.5:8545"]);

        assert_eq!(spec.image(), "consensys/teku:latest");
        assert_eq!(spec.used_ports(), ClientProfile::teku().ports());
        assert_eq!(
            spec.cmd_args(),
            [
                "--network=/shared/genesis-config.yml",
                "--initial-state=/shared/genesis.ssz",
                "--data-path=/consensus-data",
                "--data-storage-mode=PRUNE",
                "--p2p-enabled=true",
                "--eth1-endpoints=http://10.0.0.5:8545",
                "--Xee-endpoint=http://10.0.0.5:8545",
                "--p2p-advertised-ip=172.16.0.7",
                "--rest-api-enabled=true",
                "--rest-api-docs-enabled=true",
                "--rest-api-interface=0.0.0.0",
                "--rest-api-port=4000",
                "--rest-api-host-allowlist=*",
                "--Xdata-storage-non-canonical-blocks-enabled=true",
                "--Xnetwork-merge-total-terminal-difficulty=58750000000000000000",
                "--log-destination=CONSOLE",
            ]
        );
    }

    #[test]
    fn test_child_node_appends_bootnode_last() {
        let spec = render(BootstrapPeer::from_enr("enr:-abc123"), &["10.0.0.5:8545"]);
        assert_eq!(
            spec.cmd_args().last().map(String::as_str),
            Some("--p2p-discovery-bootnodes=enr:-abc123")
        );
        assert_eq!(spec.arg_value(BOOTNODES_FLAG), Some("enr:-abc123"));
    }

    #[test]
    fn test_image_override() {
        let plan = LaunchPlan::new(
            &ClientProfile::teku(),
            Some("consensys/teku:develop"),
            &params(BootstrapPeer::BootstrapNode, &["10.0.0.5:8545"]),
        );
        assert_eq!(plan.container_spec(ip(), &artifacts()).image(), "consensys/teku:develop");
    }

    #[test]
    fn test_el_urls_joined_in_order() {
        let spec = render(
            BootstrapPeer::BootstrapNode,
            &["10.0.0.6:8545", "10.0.0.5:8545"],
        );
        assert_eq!(
            spec.arg_value(EE_ENDPOINT_FLAG),
            Some("http://10.0.0.5:8545,http://10.0.0.6:8545")
        );
    }

    #[test]
    fn test_builder_is_idempotent() {
        let plan = LaunchPlan::new(
            &ClientProfile::teku(),
            None,
            &params(BootstrapPeer::from_enr("enr:-abc123"), &["a:1", "b:2", "c:3"]),
        );
        let first = plan.container_spec(ip(), &artifacts());
        let second = plan.container_spec(ip(), &artifacts());
        assert_eq!(first.cmd_args(), second.cmd_args());
        assert_eq!(first.cmd_args().join("\n").as_bytes(), second.cmd_args().join("\n").as_bytes());
    }

    proptest! {
        #[test]
        fn prop_bootnode_flag_only_for_child_nodes(enr in "[a-zA-Z0-9:_-]{0,40}") {
            let spec = render(BootstrapPeer::from_enr(enr.clone()), &["10.0.0.5:8545"]);
            if enr.is_empty() {
                prop_assert!(!spec.has_flag(BOOTNODES_FLAG));
            } else {
                let expected = format!("{BOOTNODES_FLAG}={enr}");
                prop_assert_eq!(
                    spec.cmd_args().iter().filter(|a| a.starts_with(BOOTNODES_FLAG)).count(),
                    1
                );
                prop_assert!(spec.cmd_args().contains(&expected));
            }
        }

        #[test]
        fn prop_both_el_flags_carry_same_urls(
            sockets in prop::collection::btree_set("[a-z0-9.]{1,15}:[0-9]{2,5}", 1..6)
        ) {
            let sockets: Vec<&str> = sockets.iter().map(String::as_str).collect();
            let spec = render(BootstrapPeer::BootstrapNode, &sockets);
            let eth1 = spec.arg_value(ETH1_ENDPOINTS_FLAG).map(str::to_string);
            let ee = spec.arg_value(EE_ENDPOINT_FLAG).map(str::to_string);

            prop_assert_eq!(&eth1, &ee);
            let urls = eth1.unwrap_or_default();
            let parts: BTreeSet<&str> = urls.split(',').collect();
            prop_assert_eq!(parts.len(), sockets.len());
            for socket in &sockets {
                let expected = format!("http://{socket}");
                prop_assert!(parts.contains(expected.as_str()));
            }
        }
    }
}
