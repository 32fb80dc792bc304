//! Point-in-time snapshots of tree state.
//!
//! The registry lock is never held past a call, so queries hand back owned
//! copies of the node state rather than references into the registry.

use crate::Ordinal;

/// Snapshot of one node as the registry saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeView<K> {
    /// The node's identity.
    pub id: K,
    /// Insertion ordinal assigned when the node was created.
    pub ordinal: Ordinal,
    /// Whether the node is a root of the forest.
    pub head: bool,
    /// Whether the node accepts children through automatic placement.
    pub connectable: bool,
    /// Direct children, in ascending ordinal order.
    pub children: Vec<K>,
}

impl<K> NodeView<K> {
    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether another child fits under `branching_factor`.
    pub fn has_capacity(&self, branching_factor: usize) -> bool {
        self.children.len() < branching_factor
    }
}

/// Outcome of a successful automatic placement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement<K> {
    /// The node that now relays to the placed participant, after the attach.
    pub parent: NodeView<K>,
    /// Level of `parent`; the placed participant sits at `level + 1`.
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_check() {
        let view = NodeView {
            id: 1u8,
            ordinal: Ordinal::ORIGIN,
            head: true,
            connectable: true,
            children: vec![2],
        };

        assert_eq!(view.child_count(), 1);
        assert!(view.has_capacity(2));
        assert!(!view.has_capacity(1));
    }
}
