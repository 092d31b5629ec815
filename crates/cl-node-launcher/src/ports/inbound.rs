//! # Driving Ports (Inbound API)
//!
//! The API the launcher exposes to the test-network assembler.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{ConsensusLayerClientContext, LauncherError, ServiceId, TotalTerminalDifficulty};

/// Launches consensus-layer client nodes, one per call.
///
/// Both entry points run the same sequence; they differ only in whether a
/// bootstrap ENR is passed to the client.
#[async_trait]
pub trait ConsensusClientLauncher: Send + Sync {
    /// Launch the first node of a network.
    async fn launch_boot_node(
        &self,
        service_id: ServiceId,
        el_rpc_sockets: BTreeSet<String>,
        total_terminal_difficulty: TotalTerminalDifficulty,
    ) -> Result<ConsensusLayerClientContext, LauncherError>;

    /// Launch a node that joins the network through `boot_enr`.
    ///
    /// An empty `boot_enr` launches a bootstrap node instead.
    async fn launch_child_node(
        &self,
        service_id: ServiceId,
        boot_enr: &str,
        el_rpc_sockets: BTreeSet<String>,
        total_terminal_difficulty: TotalTerminalDifficulty,
    ) -> Result<ConsensusLayerClientContext, LauncherError>;
}
