//! # Domain Module
//!
//! Core domain types for launching consensus-layer nodes.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod params;
pub mod shared;

pub use catalog::*;
pub use entities::*;
pub use errors::*;
pub use params::*;
pub use shared::*;
