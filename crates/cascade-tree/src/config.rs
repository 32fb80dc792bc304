//! Tree configuration.

use crate::error::{Error, Result};
use crate::BRANCHING_FACTOR;

/// Configuration for a [`Tree`](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum number of children per node.
    /// Default: 2 (binary fan-out).
    pub branching_factor: usize,

    /// Deepest level the placement search will consider.
    /// `None` searches until the forest runs out of levels.
    pub max_depth: Option<u32>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            branching_factor: BRANCHING_FACTOR,
            max_depth: None,
        }
    }
}

impl TreeConfig {
    /// Set the maximum number of children per node.
    #[must_use]
    pub fn with_branching_factor(mut self, branching_factor: usize) -> Self {
        self.branching_factor = branching_factor;
        self
    }

    /// Limit the placement search to `max_depth` levels.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Remove the placement depth limit.
    #[must_use]
    pub fn without_max_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Check that the configuration can place at least one node.
    pub fn validate(&self) -> Result<()> {
        if self.branching_factor == 0 {
            return Err(Error::InvalidConfig(
                "branching factor must be at least 1".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(Error::InvalidConfig("max depth must be at least 1".into()));
        }
        Ok(())
    }
}
