//! Node capability contract.
//!
//! The tree never builds node state itself. Callers hand it a factory that
//! produces values implementing [`Node`], and every mutation the tree makes
//! goes through these methods.
//!
//! Children are held by identity only. A parent never owns its children:
//! removing a node detaches edges and leaves the children registered.

use std::fmt::Debug;
use std::hash::Hash;

/// Capabilities every participant representation must provide.
pub trait Node: Send {
    /// Identity of a participant (a connection handle, peer id, ...).
    type Id: Clone + Eq + Hash + Debug + Send;

    /// This node's own identity.
    fn id(&self) -> &Self::Id;

    /// Add `child` to this node's child set. Attaching an existing child is a no-op.
    fn attach(&mut self, child: Self::Id);

    /// Remove `child` from this node's child set.
    ///
    /// Returns `true` if the child was present.
    fn detach(&mut self, child: &Self::Id) -> bool;

    /// Identities of the direct children, in no particular order.
    fn children(&self) -> Vec<Self::Id>;

    /// Whether `child` is a direct child of this node.
    fn has_child(&self, child: &Self::Id) -> bool {
        self.children().contains(child)
    }

    /// Number of direct children.
    fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Whether this node is a root of the forest.
    fn is_head(&self) -> bool;

    /// Whether this node may receive children through automatic placement.
    fn is_connectable(&self) -> bool;

    /// Flip the head flag.
    fn toggle_head(&mut self);

    /// Flip the connectable flag.
    fn toggle_connectable(&mut self);
}

impl<T: Node + ?Sized> Node for Box<T> {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }

    fn attach(&mut self, child: Self::Id) {
        (**self).attach(child)
    }

    fn detach(&mut self, child: &Self::Id) -> bool {
        (**self).detach(child)
    }

    fn children(&self) -> Vec<Self::Id> {
        (**self).children()
    }

    fn has_child(&self, child: &Self::Id) -> bool {
        (**self).has_child(child)
    }

    fn child_count(&self) -> usize {
        (**self).child_count()
    }

    fn is_head(&self) -> bool {
        (**self).is_head()
    }

    fn is_connectable(&self) -> bool {
        (**self).is_connectable()
    }

    fn toggle_head(&mut self) {
        (**self).toggle_head()
    }

    fn toggle_connectable(&mut self) {
        (**self).toggle_connectable()
    }
}
