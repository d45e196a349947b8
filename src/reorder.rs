//! Optimistic drag-and-drop reordering of sibling steps.
//!
//! A drop is applied to the local tree first and the busy flag is raised before
//! anything is sent. Only the moved node's 1-based `order` is persisted; the backend
//! renumbers the rest, which the reload after a successful save picks up.
//!
//! One reorder may be in flight at a time. What happens to the optimistic move when
//! the save fails is decided by [`RollbackPolicy`].

use crate::error::{GatewayError, ReorderError};
use crate::feedback::Feedback;
use crate::gateway::{DecisionPatch, Gateway};
use crate::model::{DecisionNode, NodeId, find_mut};
use crate::store::TrilhaStore;
use std::time::Instant;

pub const REORDER_SUCCESS_MESSAGE: &str = "Order updated";

/// A list of nodes that share a parent. Reordering never crosses groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingGroup {
    /// The top-level steps.
    Root,
    ChildrenOf(NodeId),
}

impl SiblingGroup {
    fn siblings_mut<'a>(
        &self,
        tree: &'a mut Vec<DecisionNode>,
    ) -> Result<&'a mut Vec<DecisionNode>, ReorderError> {
        match *self {
            SiblingGroup::Root => Ok(tree),
            SiblingGroup::ChildrenOf(parent) => find_mut(tree, parent)
                .map(|node| &mut node.children)
                .ok_or(ReorderError::GroupNotFound(parent)),
        }
    }
}

/// How a drag gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Dropped {
        group: SiblingGroup,
        from: usize,
        to: usize,
    },
    /// Escape, or a drop outside any valid target.
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollbackPolicy {
    /// Leave the moved order in place and wait for the next reload to reconcile.
    #[default]
    KeepOptimistic,
    /// Put the pre-drag order back.
    Restore,
}

/// Moves the element at `from` so it ends up at `to` (remove then insert, not a swap).
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), ReorderError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::IndexOutOfBounds { index, len });
        }
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

/// A move applied locally and waiting to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReorder {
    pub group: SiblingGroup,
    pub moved_id: NodeId,
    pub from: usize,
    pub to: usize,
    /// 1-based position sent to the backend.
    pub new_order: i64,
}

impl PendingReorder {
    pub fn patch(&self) -> DecisionPatch {
        DecisionPatch::order(self.new_order)
    }
}

#[derive(Debug, Clone)]
pub enum ReorderOutcome {
    /// Cancelled drag or a drop on the starting position.
    Unchanged,
    Persisted,
    Failed(GatewayError),
}

#[derive(Debug, Default)]
pub struct ReorderController {
    updating: bool,
    policy: RollbackPolicy,
    feedback: Feedback,
}

impl ReorderController {
    pub fn new(policy: RollbackPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn policy(&self) -> RollbackPolicy {
        self.policy
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    /// Applies a drop to `tree` and marks the controller busy.
    ///
    /// Returns `Ok(None)` when there is nothing to persist. A second drop while a save
    /// is pending is rejected with [`ReorderError::Busy`] and leaves `tree` untouched.
    pub fn begin(
        &mut self,
        tree: &mut Vec<DecisionNode>,
        outcome: DragOutcome,
    ) -> Result<Option<PendingReorder>, ReorderError> {
        let DragOutcome::Dropped { group, from, to } = outcome else {
            return Ok(None);
        };
        if self.updating {
            return Err(ReorderError::Busy);
        }
        if from == to {
            return Ok(None);
        }

        let siblings = group.siblings_mut(tree)?;
        let moved_id = siblings
            .get(from)
            .map(|node| node.id)
            .ok_or(ReorderError::IndexOutOfBounds {
                index: from,
                len: siblings.len(),
            })?;
        move_item(siblings, from, to)?;
        self.updating = true;

        log::debug!("Moved step {moved_id} from {from} to {to} in {group:?}");
        Ok(Some(PendingReorder {
            group,
            moved_id,
            from,
            to,
            new_order: to as i64 + 1,
        }))
    }

    /// Records the result of persisting `pending` and clears the busy flag.
    pub fn finish(
        &mut self,
        tree: &mut Vec<DecisionNode>,
        pending: &PendingReorder,
        result: &Result<DecisionNode, GatewayError>,
        now: Instant,
    ) {
        self.updating = false;
        match result {
            Ok(_) => self.feedback.success(REORDER_SUCCESS_MESSAGE, now),
            Err(err) => {
                log::error!("Failed to save new position of step {}: {err}", pending.moved_id);
                self.feedback.error(err.user_message());
                if self.policy == RollbackPolicy::Restore {
                    self.restore(tree, pending);
                }
            }
        }
    }

    fn restore(&self, tree: &mut Vec<DecisionNode>, pending: &PendingReorder) {
        let restored = pending
            .group
            .siblings_mut(tree)
            .and_then(|siblings| move_item(siblings, pending.to, pending.from));
        if let Err(err) = restored {
            log::warn!("Could not restore order of step {}: {err}", pending.moved_id);
        }
    }

    /// Runs the whole protocol for one drag: optimistic move, persist, then reload
    /// on success.
    pub async fn run(
        &mut self,
        store: &mut TrilhaStore,
        gateway: &dyn Gateway,
        outcome: DragOutcome,
    ) -> Result<ReorderOutcome, ReorderError> {
        let Some(pending) = self.begin(store.tree_mut(), outcome)? else {
            return Ok(ReorderOutcome::Unchanged);
        };

        let result = gateway
            .update_decision(pending.moved_id, &pending.patch())
            .await;
        self.finish(store.tree_mut(), &pending, &result, Instant::now());

        match result {
            Ok(_) => {
                if let Err(err) = store.reload(gateway).await {
                    log::warn!("Reload after reorder failed: {err}");
                }
                Ok(ReorderOutcome::Persisted)
            }
            Err(err) => Ok(ReorderOutcome::Failed(err)),
        }
    }
}
