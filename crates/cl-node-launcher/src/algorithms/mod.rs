//! # Algorithms
//!
//! Pure launch logic: container configuration and bounded readiness polling.

pub mod container_config;
pub mod readiness;
pub mod retry;

pub use container_config::{
    el_rpc_urls, LaunchPlan, BOOTNODES_FLAG, EE_ENDPOINT_FLAG, ETH1_ENDPOINTS_FLAG, TTD_FLAG,
};
pub use readiness::{wait_for_availability, ProbeState};
pub use retry::{bounded_retry, RetryExhausted, RetryOutcome, RetryPolicy};
