//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the launcher API callers use
//! - **Driven Ports (Outbound):** substrate, REST client and timer the
//!   launcher requires from adapters

pub mod inbound;
pub mod outbound;

pub use inbound::ConsensusClientLauncher;
pub use outbound::{
    BeaconClientFactory, BeaconNodeClient, ContainerConfigSupplier, OrchestrationSubstrate,
    Sleeper, SubstrateError,
};
