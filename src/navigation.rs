//! Expansion and selection state of the step tree.
//!
//! A [`Navigator`] owns the view state a tree is rendered under: which nodes are
//! expanded, which one is selected and the current search term. It never owns the
//! tree itself; every operation that needs it borrows the full (unfiltered) tree.
//!
//! Selecting a node queues a [`NavigationEvent::Selected`] notification. Callers
//! drain the queue after each interaction to drive the detail panel.

use crate::model::{DecisionNode, NodeId, ancestors_of};
use crate::search::{expansions_for, filter};
use ahash::AHashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// A node was picked by the user. Carries a snapshot of the node.
    Selected { node: DecisionNode },
}

#[derive(Debug, Default)]
pub struct Navigator {
    expanded: AHashSet<NodeId>,
    selected: Option<NodeId>,
    term: String,
    events: Vec<NavigationEvent>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded(&self) -> &AHashSet<NodeId> {
        &self.expanded
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    pub fn is_searching(&self) -> bool {
        !self.term.trim().is_empty()
    }

    /// Flips the node between collapsed and expanded. Leaves are ignored.
    pub fn toggle(&mut self, node: &DecisionNode) {
        if !node.has_children() {
            return;
        }
        if !self.expanded.remove(&node.id) {
            self.expanded.insert(node.id);
        }
    }

    /// Selects `node` and notifies listeners. Nodes with children are also toggled.
    pub fn select(&mut self, node: &DecisionNode) {
        self.selected = Some(node.id);
        self.events.push(NavigationEvent::Selected { node: node.clone() });
        if node.has_children() {
            self.toggle(node);
        }
    }

    /// Selects a node by id and expands its whole ancestor chain so it is visible.
    ///
    /// The node itself is left as it was. Returns `false`, touching nothing, when the
    /// id is not in `tree`. No selection event is queued.
    pub fn select_by_id(&mut self, tree: &[DecisionNode], id: NodeId) -> bool {
        let Some(ancestors) = ancestors_of(tree, id) else {
            log::debug!("Node {id} is not in the tree; selection unchanged");
            return false;
        };
        self.expanded.extend(ancestors);
        self.selected = Some(id);
        true
    }

    /// Updates the search term and returns the tree to render.
    ///
    /// A non-blank term with results replaces the expansion state with every node of
    /// the filtered tree. Going back to a blank term collapses everything, including
    /// nodes the user had expanded before searching.
    pub fn set_search_term(&mut self, tree: &[DecisionNode], term: &str) -> Vec<DecisionNode> {
        let was_searching = self.is_searching();
        self.term = term.to_string();

        if !self.is_searching() {
            if was_searching {
                self.expanded.clear();
            }
            return tree.to_vec();
        }

        self.apply_search(tree)
    }

    /// Re-renders after the tree itself changed, e.g. after a reload.
    ///
    /// While a search is active the matches in the new tree are expanded again;
    /// otherwise the expansion state is left alone.
    pub fn refresh(&mut self, tree: &[DecisionNode]) -> Vec<DecisionNode> {
        if !self.is_searching() {
            return tree.to_vec();
        }
        self.apply_search(tree)
    }

    fn apply_search(&mut self, tree: &[DecisionNode]) -> Vec<DecisionNode> {
        let filtered = filter(tree, &self.term);
        if !filtered.is_empty() {
            self.expanded = expansions_for(&filtered);
        }
        filtered
    }

    pub fn clear_search(&mut self) {
        self.term.clear();
        self.expanded.clear();
    }

    /// The tree as it should be rendered under the current search term. Does not
    /// touch expansion; use [`Navigator::refresh`] when `tree` is new.
    pub fn visible(&self, tree: &[DecisionNode]) -> Vec<DecisionNode> {
        filter(tree, &self.term)
    }

    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }
}
