//! Nested comment trees with optimistic submit and reload-on-delete.

pub mod controller;
pub mod mutation;
pub mod render;
pub mod thread;
pub mod tree;

pub use controller::{
    CommentController, DeleteOutcome, DeleteResponse, PendingSubmit, SubmitOutcome, SubmitRefused,
};
pub use mutation::{MutationState, Snapshot};
pub use render::{plan, plan_thread, CommentView, PENDING_LABEL};
pub use thread::{CommentThread, Notice, Scope};
