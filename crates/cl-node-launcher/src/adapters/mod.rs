//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete implementations of the outbound ports.

mod http_client;
pub mod mocks;
mod time;

pub use http_client::{health_from_status, HttpBeaconClient, HttpBeaconClientFactory};
pub use mocks::{InMemorySubstrate, RecordingSleeper, ScriptedBeaconClient, ScriptedClientFactory};
pub use time::TokioSleeper;
