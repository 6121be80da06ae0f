//! Error types for the bellman core library

use thiserror::Error;

/// Core error type for planning and learning operations
#[derive(Error, Debug)]
pub enum RLError {
    /// A query against the MDP model failed
    #[error("MDP error: {0}")]
    Mdp(String),

    /// Environment or simulator errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// The caller broke an agent contract
    #[error("Illegal operation: {0}")]
    IllegalOperation(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// A hyper-parameter is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for bellman operations
pub type Result<T> = std::result::Result<T, RLError>;
