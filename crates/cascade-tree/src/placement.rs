//! Breadth-first level enumeration and slot search.
//!
//! # Levels
//!
//! - Level 1: every head, connectable or not
//! - Level n+1: every connectable child of a level-n node
//!
//! Within a level, heads come in ascending ordinal order and each parent's
//! children follow in ascending ordinal order, parent by parent. A node is
//! emitted at most once, at the first level it is reached; this also bounds
//! the walk when explicit wiring has introduced a cycle.
//!
//! # Slot Search
//!
//! The first node of the shallowest level with fewer than
//! `branching_factor` children receives the new participant.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{Error, Result, Shortage};
use crate::registry::Registry;
use crate::{Node, TreeConfig, HEAD_LEVEL};

/// Iterator over the non-empty levels of a forest, shallowest first.
pub(crate) struct LevelWalk<'a, N: Node> {
    registry: &'a Registry<N>,
    frontier: Vec<N::Id>,
    visited: HashSet<N::Id>,
    level: u32,
}

impl<'a, N: Node> LevelWalk<'a, N> {
    pub(crate) fn new(registry: &'a Registry<N>) -> Self {
        let frontier = registry.heads();
        let visited = frontier.iter().cloned().collect();
        Self {
            registry,
            frontier,
            visited,
            level: HEAD_LEVEL,
        }
    }

    fn expand(&mut self) -> Vec<N::Id> {
        let mut next = Vec::new();
        for id in &self.frontier {
            let Some(entry) = self.registry.get(id) else {
                continue;
            };
            for child in self.registry.children_of(&entry.node) {
                let connectable = self
                    .registry
                    .get(&child)
                    .is_some_and(|c| c.node.is_connectable());
                if connectable && self.visited.insert(child.clone()) {
                    next.push(child);
                }
            }
        }
        next
    }
}

impl<N: Node> Iterator for LevelWalk<'_, N> {
    type Item = (u32, Vec<N::Id>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.frontier.is_empty() {
            return None;
        }

        let next = self.expand();
        let level = self.level;
        let nodes = std::mem::replace(&mut self.frontier, next);
        self.level += 1;

        trace!(level, nodes = nodes.len(), "Enumerated level");
        Some((level, nodes))
    }
}

/// Identities at breadth-first distance `level` from the heads.
///
/// Level 0 and levels past the end of the forest are empty.
pub(crate) fn level_nodes<N: Node>(registry: &Registry<N>, level: u32) -> Vec<N::Id> {
    if level < HEAD_LEVEL {
        return Vec::new();
    }
    LevelWalk::new(registry)
        .find(|(l, _)| *l == level)
        .map(|(_, nodes)| nodes)
        .unwrap_or_default()
}

/// A free slot found by [`find_slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot<K> {
    pub(crate) parent: K,
    pub(crate) level: u32,
}

/// Locate the shallowest node with spare capacity for `target`.
///
/// Neither `target` nor anything below it is a candidate, so a placement can
/// never close a loop through the target's own subtree.
pub(crate) fn find_slot<N: Node>(
    registry: &Registry<N>,
    target: &N::Id,
    config: &TreeConfig,
) -> Result<Slot<N::Id>> {
    let excluded = registry.subtree(target);
    let mut levels = 0;
    let mut examined = 0;

    for (level, nodes) in LevelWalk::new(registry) {
        if let Some(max_depth) = config.max_depth {
            if level > max_depth {
                return Err(Error::NoAvailableSlot(Shortage::DepthLimit { max_depth }));
            }
        }
        levels = level;

        for id in nodes {
            if excluded.contains(&id) {
                continue;
            }
            examined += 1;

            let has_room = registry
                .get(&id)
                .is_some_and(|entry| entry.node.child_count() < config.branching_factor);
            if has_room {
                return Ok(Slot { parent: id, level });
            }
        }
    }

    let shortage = if levels == 0 {
        Shortage::NoHeads
    } else {
        Shortage::Saturated { levels, examined }
    };
    Err(Error::NoAvailableSlot(shortage))
}
