//! Stock node implementation.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{Node, Ordinal};

/// A general-purpose relay node.
///
/// Tracks its identity, the ordinal it was created with, a human-readable
/// label, both flags and its child set. New relays start as plain,
/// non-connectable members with no children.
#[derive(Debug, Clone)]
pub struct RelayNode<K> {
    id: K,
    ordinal: Ordinal,
    label: String,
    head: bool,
    connectable: bool,
    children: HashSet<K>,
}

impl<K: Clone + Eq + Hash> RelayNode<K> {
    /// Create a relay with the default label `relay <n>`.
    pub fn new(id: K, ordinal: Ordinal) -> Self {
        Self {
            id,
            ordinal,
            label: format!("relay {}", ordinal.value()),
            head: false,
            connectable: false,
            children: HashSet::new(),
        }
    }

    /// Factory function suitable for [`Tree::new`](crate::Tree::new).
    pub fn fill(id: &K, ordinal: Ordinal) -> Self {
        Self::new(id.clone(), ordinal)
    }

    /// Replace the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Ordinal this relay was created with.
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<K> Node for RelayNode<K>
where
    K: Clone + Eq + Hash + Debug + Send,
{
    type Id = K;

    fn id(&self) -> &K {
        &self.id
    }

    fn attach(&mut self, child: K) {
        self.children.insert(child);
    }

    fn detach(&mut self, child: &K) -> bool {
        self.children.remove(child)
    }

    fn children(&self) -> Vec<K> {
        self.children.iter().cloned().collect()
    }

    fn has_child(&self, child: &K) -> bool {
        self.children.contains(child)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn is_head(&self) -> bool {
        self.head
    }

    fn is_connectable(&self) -> bool {
        self.connectable
    }

    fn toggle_head(&mut self) {
        self.head = !self.head;
    }

    fn toggle_connectable(&mut self) {
        self.connectable = !self.connectable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_relay_is_plain_member() {
        let relay = RelayNode::fill(&"peer", Ordinal::new(5));

        assert_eq!(*relay.id(), "peer");
        assert_eq!(relay.ordinal(), Ordinal::new(5));
        assert_eq!(relay.label(), "relay 5");
        assert!(!relay.is_head());
        assert!(!relay.is_connectable());
        assert_eq!(relay.child_count(), 0);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut relay = RelayNode::new(1u8, Ordinal::ORIGIN);
        relay.toggle_head();
        relay.toggle_connectable();
        assert!(relay.is_head());
        assert!(relay.is_connectable());

        relay.toggle_connectable();
        assert!(!relay.is_connectable());
    }

    #[test]
    fn children_are_a_set() {
        let mut relay = RelayNode::new(0u8, Ordinal::ORIGIN);
        relay.attach(1);
        relay.attach(1);
        relay.attach(2);

        assert_eq!(relay.child_count(), 2);
        assert!(relay.has_child(&2));
        assert!(relay.detach(&1));
        assert!(!relay.has_child(&1));
    }

    #[test]
    fn custom_label() {
        let relay = RelayNode::new(0u8, Ordinal::ORIGIN).with_label("broadcaster");
        assert_eq!(relay.label(), "broadcaster");
    }
}
