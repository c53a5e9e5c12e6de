//! ecplace Common - Shared types and utilities
//!
//! This crate provides the erasure code descriptor, identifier types, the
//! error definitions and the simulation configuration used across all
//! ecplace components.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DEFAULT_EPSILON, SimulationConfig};
pub use error::{Error, Result};
pub use types::*;
