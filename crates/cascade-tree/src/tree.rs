//! The shared, lock-guarded fan-out tree.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::placement::{self, Slot};
use crate::registry::Registry;
use crate::{Node, NodeView, Ordinal, Placement, TreeConfig};

/// Node constructor invoked once per [`Tree::insert`].
pub type Factory<N> = Box<dyn Fn(&<N as Node>::Id, Ordinal) -> N + Send + Sync>;

/// Thread-safe registry of relay nodes with breadth-first placement.
///
/// Every operation takes one exclusive lock for its whole duration, so each
/// call is linearizable. Multi-call sequences are not: callers that need
/// "toggle then place" as a unit should use [`insert_child`](Self::insert_child).
///
/// Share across threads or tasks with `Arc<Tree<N>>`.
pub struct Tree<N: Node> {
    registry: Mutex<Registry<N>>,
    config: TreeConfig,
}

impl<N: Node> Tree<N> {
    /// Create a tree with the default configuration.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&N::Id, Ordinal) -> N + Send + Sync + 'static,
    {
        Self {
            registry: Mutex::new(Registry::new(Box::new(factory))),
            config: TreeConfig::default(),
        }
    }

    /// Create a tree with a custom configuration.
    pub fn with_config<F>(config: TreeConfig, factory: F) -> Result<Self>
    where
        F: Fn(&N::Id, Ordinal) -> N + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            registry: Mutex::new(Registry::new(Box::new(factory))),
            config,
        })
    }

    /// The tree's configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replace the node factory. Nodes already stored are untouched.
    pub fn set_factory<F>(&self, factory: F)
    where
        F: Fn(&N::Id, Ordinal) -> N + Send + Sync + 'static,
    {
        self.registry.lock().set_factory(Box::new(factory));
    }

    /// Register `id`, building its node through the factory.
    ///
    /// An existing entry under the same identity is replaced (last write
    /// wins). Edges other nodes hold toward `id` are kept.
    pub fn insert(&self, id: N::Id) -> Ordinal {
        let mut registry = self.registry.lock();
        let (ordinal, replaced) = registry.insert(id.clone());

        if let Some(previous) = replaced {
            warn!(node = ?id, %previous, %ordinal, "Replaced existing node");
        } else {
            debug!(node = ?id, %ordinal, "Inserted node");
        }
        ordinal
    }

    /// Remove `id` from every child set, then from the registry.
    ///
    /// Children of `id` stay registered. Returns `false` if `id` was unknown.
    pub fn delete(&self, id: &N::Id) -> bool {
        let removed = self.registry.lock().remove(id);
        debug!(node = ?id, removed, "Deleted node");
        removed
    }

    /// Flip the head flag, returning the new value.
    pub fn toggle_head(&self, id: &N::Id) -> Result<bool> {
        let head = self.registry.lock().toggle_head(id)?;
        debug!(node = ?id, head, "Toggled head");
        Ok(head)
    }

    /// Flip the connectable flag, returning the new value.
    pub fn toggle_connectable(&self, id: &N::Id) -> Result<bool> {
        let connectable = self.registry.lock().toggle_connectable(id)?;
        debug!(node = ?id, connectable, "Toggled connectable");
        Ok(connectable)
    }

    /// Snapshot of the node under `id`.
    pub fn get(&self, id: &N::Id) -> Option<NodeView<N::Id>> {
        self.registry.lock().view(id)
    }

    /// Run `f` against the stored node while holding the lock.
    ///
    /// Gives read access to caller-defined node state that [`NodeView`]
    /// does not capture. `f` must not call back into this tree.
    pub fn with_node<R>(&self, id: &N::Id, f: impl FnOnce(&N) -> R) -> Option<R> {
        self.registry.lock().get(id).map(|entry| f(&entry.node))
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &N::Id) -> bool {
        self.registry.lock().contains(id)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attach the registered node `child` under `parent`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`](crate::Error::NotFound) if either identity is unknown
    /// - [`Error::SelfAttachment`](crate::Error::SelfAttachment) if `parent == child`
    /// - [`Error::ParentFull`](crate::Error::ParentFull) if `parent` has no room
    pub fn insert_connected(&self, parent: &N::Id, child: &N::Id) -> Result<()> {
        self.registry
            .lock()
            .attach(parent, child, self.config.branching_factor)?;
        debug!(parent = ?parent, child = ?child, "Connected child");
        Ok(())
    }

    /// Detach `child` from `parent` only; `child` stays registered.
    ///
    /// Returns whether an edge was removed.
    pub fn delete_connected(&self, parent: &N::Id, child: &N::Id) -> Result<bool> {
        let removed = self.registry.lock().detach(parent, child)?;
        debug!(parent = ?parent, child = ?child, removed, "Disconnected child");
        Ok(removed)
    }

    /// Snapshot of every node keyed by identity.
    pub fn get_all(&self) -> HashMap<N::Id, NodeView<N::Id>> {
        self.registry
            .lock()
            .views()
            .into_iter()
            .map(|view| (view.id.clone(), view))
            .collect()
    }

    /// Snapshot of every node in ascending ordinal order.
    pub fn snapshot(&self) -> Vec<NodeView<N::Id>> {
        self.registry.lock().views()
    }

    /// Nodes at breadth-first distance `level` from the heads.
    ///
    /// Level 1 is every head regardless of its connectable flag; deeper
    /// levels hold connectable children only. Empty when the forest is
    /// shallower than `level`, and for level 0.
    pub fn level_nodes(&self, level: u32) -> Vec<NodeView<N::Id>> {
        let registry = self.registry.lock();
        placement::level_nodes(&registry, level)
            .iter()
            .filter_map(|id| registry.view(id))
            .collect()
    }

    /// Every non-empty level, shallowest first.
    pub fn levels(&self) -> Vec<Vec<NodeView<N::Id>>> {
        let registry = self.registry.lock();
        placement::LevelWalk::new(&registry)
            .map(|(_, ids)| ids.iter().filter_map(|id| registry.view(id)).collect())
            .collect()
    }

    /// Attach `target` under the shallowest node with spare capacity.
    ///
    /// The search and the attach run under a single lock acquisition. If
    /// `target` already has parents it is detached from them first and keeps
    /// its own children; nothing inside its subtree is a candidate. On failure
    /// the previous edges are put back.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`](crate::Error::NotFound) if `target` is unknown
    /// - [`Error::NoAvailableSlot`](crate::Error::NoAvailableSlot) if no node has room
    pub fn insert_tree(&self, target: &N::Id) -> Result<Placement<N::Id>> {
        let mut registry = self.registry.lock();
        self.place(&mut registry, target)
    }

    /// Optionally mark `target` connectable, then place it.
    ///
    /// Both steps share one lock acquisition. The connectable toggle is kept
    /// even when no slot is found, so a later retry only needs to place.
    pub fn insert_child(&self, target: &N::Id, mark_connectable: bool) -> Result<Placement<N::Id>> {
        let mut registry = self.registry.lock();
        if mark_connectable {
            let connectable = registry.toggle_connectable(target)?;
            debug!(node = ?target, connectable, "Toggled connectable before placement");
        }
        self.place(&mut registry, target)
    }

    fn place(&self, registry: &mut Registry<N>, target: &N::Id) -> Result<Placement<N::Id>> {
        if !registry.contains(target) {
            return Err(Error::not_found(target));
        }

        // A node that is already wired in moves: it keeps its subtree but
        // ends up with exactly one parent.
        let previous = registry.release(target);

        let attached = placement::find_slot(registry, target, &self.config).and_then(|slot| {
            registry.attach(&slot.parent, target, self.config.branching_factor)?;
            Ok(slot)
        });
        let Slot { parent, level } = match attached {
            Ok(slot) => slot,
            Err(err) => {
                registry.restore(target, &previous);
                debug!(node = ?target, %err, "Placement failed");
                return Err(err);
            }
        };

        if previous.is_empty() {
            debug!(node = ?target, parent = ?parent, level, "Placed node");
        } else {
            debug!(node = ?target, from = ?previous, parent = ?parent, level, "Moved node");
        }

        let parent = registry
            .view(&parent)
            .ok_or_else(|| Error::not_found(&parent))?;
        Ok(Placement { parent, level })
    }
}

impl<N: Node> std::fmt::Debug for Tree<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
