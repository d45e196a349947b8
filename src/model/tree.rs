//! Read-only traversals over a normalized tree.
//!
//! All lookups are depth-first in sibling order and assume acyclic input.

use super::definition::{DecisionNode, NodeId};

/// Finds a node anywhere in the tree.
pub fn find(tree: &[DecisionNode], id: NodeId) -> Option<&DecisionNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut(tree: &mut [DecisionNode], id: NodeId) -> Option<&mut DecisionNode> {
    for node in tree.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Ids of every ancestor of `id`, root first. `None` when `id` is not in the tree;
/// an empty path means `id` is a root.
pub fn ancestors_of(tree: &[DecisionNode], id: NodeId) -> Option<Vec<NodeId>> {
    fn walk(nodes: &[DecisionNode], id: NodeId, path: &mut Vec<NodeId>) -> bool {
        for node in nodes {
            if node.id == id {
                return true;
            }
            path.push(node.id);
            if walk(&node.children, id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    walk(tree, id, &mut path).then_some(path)
}

/// Pre-order listing of every node (parent before its children).
pub fn flatten(tree: &[DecisionNode]) -> Vec<&DecisionNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&DecisionNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
    out
}

/// The nodes a root's `go_to` points at, in go-to order. Unknown ids are skipped.
pub fn resolve_go_to<'a>(node: &DecisionNode, tree: &'a [DecisionNode]) -> Vec<&'a DecisionNode> {
    node.go_to.iter().filter_map(|id| find(tree, id)).collect()
}

/// Number of nodes in the tree, all depths included.
pub fn count(tree: &[DecisionNode]) -> usize {
    tree.iter().map(|node| 1 + count(&node.children)).sum()
}
