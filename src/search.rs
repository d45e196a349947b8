//! The search/filter engine.
//!
//! `filter` prunes a tree down to the nodes matching a term plus their ancestor
//! chains. Every retained node carries `highlighted == true` only when it matched
//! itself, so direct hits can be told apart from pass-through ancestors.

use crate::model::{DecisionNode, NodeId};
use ahash::AHashSet;

/// Case-insensitive substring match against the description and, when present, the title.
///
/// `needle` must already be lowercased.
fn matches_lowered(node: &DecisionNode, needle: &str) -> bool {
    node.description.to_lowercase().contains(needle)
        || node
            .title
            .as_deref()
            .is_some_and(|title| title.to_lowercase().contains(needle))
}

/// A blank term matches everything. Otherwise the term is used as typed,
/// surrounding whitespace included.
pub fn matches(node: &DecisionNode, term: &str) -> bool {
    term.trim().is_empty() || matches_lowered(node, &term.to_lowercase())
}

/// Filters `tree` by `term`. A blank term returns the tree unchanged.
pub fn filter(tree: &[DecisionNode], term: &str) -> Vec<DecisionNode> {
    if term.trim().is_empty() {
        return tree.to_vec();
    }
    filter_level(tree, &term.to_lowercase())
}

fn filter_level(nodes: &[DecisionNode], needle: &str) -> Vec<DecisionNode> {
    // Every sibling is visited; a match in one branch never hides another.
    nodes
        .iter()
        .filter_map(|node| {
            let children = filter_level(&node.children, needle);
            let direct = matches_lowered(node, needle);
            if !direct && children.is_empty() {
                return None;
            }
            let mut kept = node.with_children(children);
            kept.highlighted = direct;
            Some(kept)
        })
        .collect()
}

/// Ids to expand so every match in a filtered tree is visible: every node in it.
pub fn expansions_for(filtered: &[DecisionNode]) -> AHashSet<NodeId> {
    let mut expanded = AHashSet::new();
    let mut stack: Vec<&DecisionNode> = filtered.iter().collect();
    while let Some(node) = stack.pop() {
        expanded.insert(node.id);
        stack.extend(node.children.iter());
    }
    expanded
}
