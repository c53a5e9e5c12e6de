//! Error types for ecplace
//!
//! This module defines the common error types used throughout the system.
//! Every variant is a precondition failure: the planner never retries.

use thiserror::Error;

/// Common result type for ecplace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for ecplace
#[derive(Debug, Error)]
pub enum Error {
    // Configuration errors
    #[error("invalid erasure code: {0}")]
    InvalidCode(String),

    #[error("insufficient nodes for placement: have {available}, need {required}")]
    InsufficientNodes { available: usize, required: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Group insertion errors
    #[error("placement group length mismatch: expected {expected} nodes, got {actual}")]
    GroupLengthMismatch { expected: usize, actual: usize },

    #[error("node {node} out of range for cluster of {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("node {node} appears more than once in placement group")]
    DuplicateNode { node: usize },

    // Selection errors
    #[error("no eligible node for stripe position {position}")]
    NoEligibleNode { position: usize },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this error was caused by the parameters the caller supplied
    /// (code, cluster size, config file) rather than by a selection dead end
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidCode(_)
                | Self::InsufficientNodes { .. }
                | Self::InvalidArgument(_)
                | Self::Configuration(_)
                | Self::Deserialization(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Deserialization(e.to_string())
    }
}
