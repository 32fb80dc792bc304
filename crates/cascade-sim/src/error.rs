//! Error types for cascade-sim.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// The tree rejected an operation the simulation expected to succeed.
    #[error("tree error: {0}")]
    Tree(#[from] cascade_tree::Error),

    /// Simulation parameters are out of range.
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    /// A concurrent join task panicked or was cancelled.
    #[error("join task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Event log serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
