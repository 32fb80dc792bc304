//! Cascade Fan-Out Tree
//!
//! A capacity-bounded relay forest for broadcast scenarios. A source feeds one
//! or more **head** nodes; every other participant is placed under an existing
//! node so the stream cascades outward with at most [`BRANCHING_FACTOR`]
//! children per relay.
//!
//! # Placement
//!
//! New participants are placed breadth-first, left-to-right:
//!
//! - Level 1 is the set of heads
//! - Level n+1 is every connectable child of a level-n node
//! - The first node (shallowest, lowest ordinal) with spare capacity wins
//!
//! The search and the attach happen inside one critical section, so two
//! concurrent joins can never both claim the last slot of a relay.
//!
//! # Example
//!
//! ```rust
//! use cascade_tree::{RelayNode, Tree};
//!
//! let tree: Tree<RelayNode<&str>> = Tree::new(RelayNode::fill);
//!
//! tree.insert("source");
//! tree.toggle_head(&"source")?;
//!
//! tree.insert("alice");
//! let placement = tree.insert_child(&"alice", true)?;
//! assert_eq!(placement.parent.id, "source");
//! assert_eq!(placement.level, 1);
//! # Ok::<(), cascade_tree::Error>(())
//! ```

mod config;
mod error;
mod node;
mod ordinal;
mod placement;
mod registry;
mod relay;
mod tree;
mod view;

pub use config::TreeConfig;
pub use error::{Error, Result, Shortage};
pub use node::Node;
pub use ordinal::Ordinal;
pub use relay::RelayNode;
pub use tree::{Factory, Tree};
pub use view::{NodeView, Placement};

/// Default maximum number of children a relay serves.
pub const BRANCHING_FACTOR: usize = 2;

/// Level number of the head nodes.
pub const HEAD_LEVEL: u32 = 1;

// A relay that cannot serve anyone would make every placement fail
const _: () = assert!(BRANCHING_FACTOR > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_branching_factor() {
        assert_eq!(TreeConfig::default().branching_factor, BRANCHING_FACTOR);
    }
}
