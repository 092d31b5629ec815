//! # Identity Resolver
//!
//! Single identity request against a node already known to be healthy.

use crate::domain::{ClientError, NodeIdentity};
use crate::ports::BeaconNodeClient;

/// Fetch the node's identity. Exactly one request; no retries.
///
/// # Errors
///
/// The client's error, or [`ClientError::Parse`] when the node reports an
/// empty ENR (child nodes could not bootstrap from it).
pub async fn resolve_identity<C>(client: &C) -> Result<NodeIdentity, ClientError>
where
    C: BeaconNodeClient + ?Sized,
{
    let identity = client.get_node_identity().await?;
    if identity.enr.is_empty() {
        return Err(ClientError::Parse(
            "node identity response carried an empty ENR".to_string(),
        ));
    }
    Ok(identity)
}
