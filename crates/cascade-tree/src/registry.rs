//! Registry state guarded by the tree lock.
//!
//! Everything here assumes the caller already holds the lock; [`Tree`]
//! is the only owner.
//!
//! [`Tree`]: crate::Tree

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::tree::Factory;
use crate::{Node, NodeView, Ordinal};

/// A stored node together with the ordinal the registry gave it.
pub(crate) struct Entry<N> {
    pub(crate) ordinal: Ordinal,
    pub(crate) node: N,
}

/// Identity → node map, ordinal counter and node factory.
pub(crate) struct Registry<N: Node> {
    nodes: HashMap<N::Id, Entry<N>>,
    next_ordinal: Ordinal,
    factory: Factory<N>,
}

impl<N: Node> Registry<N> {
    pub(crate) fn new(factory: Factory<N>) -> Self {
        Self {
            nodes: HashMap::new(),
            next_ordinal: Ordinal::ORIGIN,
            factory,
        }
    }

    pub(crate) fn set_factory(&mut self, factory: Factory<N>) {
        self.factory = factory;
    }

    /// Build a node through the factory and store it under `id`.
    ///
    /// Returns the assigned ordinal and the ordinal of any entry it replaced.
    pub(crate) fn insert(&mut self, id: N::Id) -> (Ordinal, Option<Ordinal>) {
        let ordinal = self.next_ordinal;
        let node = (self.factory)(&id, ordinal);
        self.next_ordinal = ordinal.next();

        let replaced = self
            .nodes
            .insert(id, Entry { ordinal, node })
            .map(|old| old.ordinal);
        (ordinal, replaced)
    }

    /// Detach `id` from every node, then drop its entry.
    pub(crate) fn remove(&mut self, id: &N::Id) -> bool {
        for entry in self.nodes.values_mut() {
            entry.node.detach(id);
        }
        self.nodes.remove(id).is_some()
    }

    pub(crate) fn get(&self, id: &N::Id) -> Option<&Entry<N>> {
        self.nodes.get(id)
    }

    fn get_mut(&mut self, id: &N::Id) -> Result<&mut Entry<N>> {
        self.nodes.get_mut(id).ok_or_else(|| Error::not_found(id))
    }

    pub(crate) fn contains(&self, id: &N::Id) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn toggle_head(&mut self, id: &N::Id) -> Result<bool> {
        let node = &mut self.get_mut(id)?.node;
        node.toggle_head();
        Ok(node.is_head())
    }

    pub(crate) fn toggle_connectable(&mut self, id: &N::Id) -> Result<bool> {
        let node = &mut self.get_mut(id)?.node;
        node.toggle_connectable();
        Ok(node.is_connectable())
    }

    /// Add the edge `parent -> child` if `parent` has room.
    pub(crate) fn attach(&mut self, parent: &N::Id, child: &N::Id, capacity: usize) -> Result<()> {
        if parent == child {
            return Err(Error::SelfAttachment(format!("{parent:?}")));
        }
        if !self.nodes.contains_key(child) {
            return Err(Error::not_found(child));
        }

        let node = &mut self.get_mut(parent)?.node;
        if node.has_child(child) {
            return Ok(());
        }
        if node.child_count() >= capacity {
            return Err(Error::ParentFull {
                parent: format!("{parent:?}"),
                capacity,
            });
        }
        node.attach(child.clone());
        Ok(())
    }

    /// Remove the edge `parent -> child`; `child` stays registered.
    pub(crate) fn detach(&mut self, parent: &N::Id, child: &N::Id) -> Result<bool> {
        Ok(self.get_mut(parent)?.node.detach(child))
    }

    /// Head identities in ascending ordinal order.
    pub(crate) fn heads(&self) -> Vec<N::Id> {
        let mut heads: Vec<_> = self
            .nodes
            .iter()
            .filter(|(_, entry)| entry.node.is_head())
            .map(|(id, entry)| (entry.ordinal, id.clone()))
            .collect();
        heads.sort_unstable_by_key(|(ordinal, _)| *ordinal);
        heads.into_iter().map(|(_, id)| id).collect()
    }

    /// Registered children of `node` in ascending ordinal order.
    pub(crate) fn children_of(&self, node: &N) -> Vec<N::Id> {
        let mut children: Vec<_> = node
            .children()
            .into_iter()
            .filter_map(|child| self.nodes.get(&child).map(|entry| (entry.ordinal, child)))
            .collect();
        children.sort_unstable_by_key(|(ordinal, _)| *ordinal);
        children.into_iter().map(|(_, id)| id).collect()
    }

    /// Every node reachable from `id` through child edges, `id` included.
    ///
    /// Follows all edges regardless of the connectable flag.
    pub(crate) fn subtree(&self, id: &N::Id) -> HashSet<N::Id> {
        let mut seen = HashSet::from([id.clone()]);
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            let Some(entry) = self.nodes.get(&current) else {
                continue;
            };
            for child in entry.node.children() {
                if seen.insert(child.clone()) {
                    stack.push(child);
                }
            }
        }
        seen
    }

    /// Detach `child` from every parent, returning those parents.
    pub(crate) fn release(&mut self, child: &N::Id) -> Vec<N::Id> {
        self.nodes
            .iter_mut()
            .filter_map(|(id, entry)| entry.node.detach(child).then(|| id.clone()))
            .collect()
    }

    /// Re-add edges removed by [`release`](Self::release).
    ///
    /// No capacity check: each parent held `child` before it was released.
    pub(crate) fn restore(&mut self, child: &N::Id, parents: &[N::Id]) {
        for parent in parents {
            if let Some(entry) = self.nodes.get_mut(parent) {
                entry.node.attach(child.clone());
            }
        }
    }

    pub(crate) fn view(&self, id: &N::Id) -> Option<NodeView<N::Id>> {
        self.nodes.get(id).map(|entry| self.view_entry(id, entry))
    }

    fn view_entry(&self, id: &N::Id, entry: &Entry<N>) -> NodeView<N::Id> {
        NodeView {
            id: id.clone(),
            ordinal: entry.ordinal,
            head: entry.node.is_head(),
            connectable: entry.node.is_connectable(),
            children: self.children_of(&entry.node),
        }
    }

    /// Views of every node in ascending ordinal order.
    pub(crate) fn views(&self) -> Vec<NodeView<N::Id>> {
        let mut views: Vec<_> = self
            .nodes
            .iter()
            .map(|(id, entry)| self.view_entry(id, entry))
            .collect();
        views.sort_unstable_by_key(|view| view.ordinal);
        views
    }
}
