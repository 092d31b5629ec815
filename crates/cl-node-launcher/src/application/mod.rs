//! # Application Module
//!
//! Application services orchestrating the domain, algorithms and outbound
//! ports.

pub mod identity;
pub mod provisioner;
pub mod service;

pub use identity::resolve_identity;
pub use provisioner::ArtifactProvisioner;
pub use service::{config_supplier, ClClientLauncher};
