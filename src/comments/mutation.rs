//! Optimistic submit bookkeeping: what was applied, and how to undo it.

use super::{tree, CommentThread};
use crate::models::{Comment, CommentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    /// The provisional node is visible, the request is in flight.
    Applied,
    Confirmed,
    RolledBack,
}

impl MutationState {
    pub fn apply(self) -> Self {
        match self {
            MutationState::Idle => MutationState::Applied,
            other => other,
        }
    }

    pub fn settle(self, ok: bool) -> Self {
        match (self, ok) {
            (MutationState::Applied, true) => MutationState::Confirmed,
            (MutationState::Applied, false) => MutationState::RolledBack,
            (other, _) => other,
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self, MutationState::Confirmed | MutationState::RolledBack)
    }
}

/// The thread as it was right before a provisional node went in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub provisional_id: CommentId,
    pub parent_id: Option<CommentId>,
    pub prior_count: usize,
}

/// Puts `node` at the front of its container as a pending node and bumps
/// the count. The node is handed back when its parent is unknown.
pub fn apply(
    thread: &mut CommentThread,
    parent: Option<&CommentId>,
    node: Comment,
) -> Result<Snapshot, Comment> {
    let snapshot = Snapshot {
        provisional_id: node.id.clone(),
        parent_id: parent.cloned(),
        prior_count: thread.count,
    };
    let id = node.id.clone();
    tree::insert_front(&mut thread.roots, parent, node)?;
    thread.pending.push(id);
    thread.count += 1;
    Ok(snapshot)
}

/// The thread with the provisional node of `snapshot` taken out and the
/// count it had before, plus whatever was applied after it.
///
/// When a reload already replaced the tree the node is gone and the
/// thread is returned as is.
pub fn rollback(thread: &CommentThread, snapshot: &Snapshot) -> CommentThread {
    let mut restored = thread.clone();
    let Some(pos) = restored
        .pending
        .iter()
        .position(|x| x == &snapshot.provisional_id)
    else {
        return restored;
    };

    let applied_after = restored.pending.len() - pos - 1;
    restored.pending.remove(pos);
    tree::remove(&mut restored.roots, &snapshot.provisional_id);
    restored.count = snapshot.prior_count + applied_after;
    restored
}
