//! Error types for cascade-tree.

use std::fmt;

use thiserror::Error;

/// Result type for cascade-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating or querying a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The referenced identity is not registered.
    #[error("node not found: {0}")]
    NotFound(String),

    /// The placement search found no node with spare capacity.
    #[error("no available slot: {0}")]
    NoAvailableSlot(Shortage),

    /// Explicit wiring would push a parent past the branching factor.
    #[error("parent {parent} already relays to {capacity} children")]
    ParentFull { parent: String, capacity: usize },

    /// A node was asked to relay to itself.
    #[error("node {0} cannot relay to itself")]
    SelfAttachment(String),

    /// The tree configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn not_found(id: &impl fmt::Debug) -> Self {
        Self::NotFound(format!("{id:?}"))
    }

    /// Whether retrying later (after capacity frees up) could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoAvailableSlot(_) | Self::ParentFull { .. })
    }
}

/// Why the placement search came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shortage {
    /// There are no head nodes, so the forest is empty.
    NoHeads,
    /// Every reachable eligible node is at capacity.
    Saturated {
        /// Number of non-empty levels that were searched.
        levels: u32,
        /// Number of candidate nodes inspected.
        examined: usize,
    },
    /// The configured depth limit was reached before a slot was found.
    DepthLimit { max_depth: u32 },
}

impl fmt::Display for Shortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHeads => write!(f, "no head nodes to connect to"),
            Self::Saturated { levels, examined } => write!(
                f,
                "all {examined} eligible nodes across {levels} levels are full"
            ),
            Self::DepthLimit { max_depth } => {
                write!(f, "no free slot within {max_depth} levels")
            }
        }
    }
}
