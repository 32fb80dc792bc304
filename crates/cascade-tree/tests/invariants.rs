//! Property tests: random operation sequences keep the forest well-formed.

use std::collections::HashSet;

use cascade_tree::{Error, Node, RelayNode, Tree, BRANCHING_FACTOR};
use proptest::prelude::*;

/// Identities are drawn from a small pool so operations collide often.
const POOL: u8 = 12;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Delete(u8),
    ToggleHead(u8),
    ToggleConnectable(u8),
    Connect(u8, u8),
    Disconnect(u8, u8),
    Place(u8),
    PlaceChild(u8, bool),
}

fn op() -> impl Strategy<Value = Op> {
    let id = 0..POOL;
    prop_oneof![
        3 => id.clone().prop_map(Op::Insert),
        1 => id.clone().prop_map(Op::Delete),
        1 => id.clone().prop_map(Op::ToggleHead),
        2 => id.clone().prop_map(Op::ToggleConnectable),
        1 => (id.clone(), id.clone()).prop_map(|(p, c)| Op::Connect(p, c)),
        1 => (id.clone(), id.clone()).prop_map(|(p, c)| Op::Disconnect(p, c)),
        3 => id.clone().prop_map(Op::Place),
        2 => (id, any::<bool>()).prop_map(|(c, m)| Op::PlaceChild(c, m)),
    ]
}

fn apply(tree: &Tree<RelayNode<u8>>, op: &Op) {
    // Errors are expected outcomes here; only the invariants matter
    match *op {
        Op::Insert(id) => {
            tree.insert(id);
        }
        Op::Delete(id) => {
            tree.delete(&id);
        }
        Op::ToggleHead(id) => {
            let _ = tree.toggle_head(&id);
        }
        Op::ToggleConnectable(id) => {
            let _ = tree.toggle_connectable(&id);
        }
        Op::Connect(p, c) => {
            let _ = tree.insert_connected(&p, &c);
        }
        Op::Disconnect(p, c) => {
            let _ = tree.delete_connected(&p, &c);
        }
        Op::Place(id) => {
            let _ = tree.insert_tree(&id);
        }
        Op::PlaceChild(id, mark) => {
            let _ = tree.insert_child(&id, mark);
        }
    }
}

/// Whether any node can reach itself through child edges.
fn has_cycle(tree: &Tree<RelayNode<u8>>) -> bool {
    let all = tree.get_all();
    all.keys().any(|start| {
        let mut seen = HashSet::new();
        let mut stack = all[start].children.clone();
        while let Some(id) = stack.pop() {
            if id == *start {
                return true;
            }
            if seen.insert(id) {
                stack.extend(all[&id].children.iter().copied());
            }
        }
        false
    })
}

proptest! {
    #[test]
    fn capacity_and_edges_hold(ops in prop::collection::vec(op(), 1..200)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            apply(&tree, op);

            let all = tree.get_all();
            for id in all.keys() {
                let children = tree.with_node(id, |n| n.children()).unwrap();
                prop_assert!(children.len() <= BRANCHING_FACTOR);
                prop_assert!(!children.contains(id));
                for child in &children {
                    prop_assert!(all.contains_key(child), "dangling {} -> {}", id, child);
                }
            }
        }
    }

    #[test]
    fn level_one_matches_heads(ops in prop::collection::vec(op(), 1..100)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            apply(&tree, op);
        }

        let heads: HashSet<u8> = tree
            .snapshot()
            .into_iter()
            .filter(|v| v.head)
            .map(|v| v.id)
            .collect();
        let level_one: HashSet<u8> = tree.level_nodes(1).into_iter().map(|v| v.id).collect();
        prop_assert_eq!(heads, level_one);
    }

    #[test]
    fn levels_never_repeat_a_node(ops in prop::collection::vec(op(), 1..150)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            apply(&tree, op);
        }

        let mut seen = HashSet::new();
        for level in tree.levels() {
            for view in level {
                prop_assert!(seen.insert(view.id), "{} listed twice", view.id);
            }
        }
    }

    #[test]
    fn placement_lands_at_shallowest_free_level(ops in prop::collection::vec(op(), 1..100)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            apply(&tree, op);
        }

        let target = POOL; // Outside the pool, so never wired yet
        tree.insert(target);
        let levels = tree.levels();

        match tree.insert_tree(&target) {
            Ok(placement) => {
                let idx = (placement.level - 1) as usize;
                for shallower in &levels[..idx] {
                    prop_assert!(shallower.iter().all(|v| v.child_count() >= BRANCHING_FACTOR));
                }
                prop_assert!(placement.parent.children.contains(&target));
            }
            Err(Error::NoAvailableSlot(_)) => {
                for level in &levels {
                    prop_assert!(level.iter().all(|v| v.child_count() >= BRANCHING_FACTOR));
                }
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn placement_never_closes_a_loop(ops in prop::collection::vec(op(), 1..200)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            // Explicit wiring may build loops on purpose; placement must not
            if matches!(op, Op::Connect(..)) {
                continue;
            }
            apply(&tree, op);
            prop_assert!(!has_cycle(&tree), "loop after {:?}", op);
        }
    }

    #[test]
    fn placement_leaves_a_single_parent(ops in prop::collection::vec(op(), 1..150)) {
        let tree: Tree<RelayNode<u8>> = Tree::new(RelayNode::fill);
        for op in &ops {
            let placed = match *op {
                Op::Place(id) => tree.insert_tree(&id).ok().map(|_| id),
                Op::PlaceChild(id, mark) => tree.insert_child(&id, mark).ok().map(|_| id),
                _ => {
                    apply(&tree, op);
                    None
                }
            };

            if let Some(id) = placed {
                let parents = tree
                    .snapshot()
                    .iter()
                    .filter(|v| v.children.contains(&id))
                    .count();
                prop_assert_eq!(parents, 1, "{} has {} parents", id, parents);
            }
        }
    }
}
