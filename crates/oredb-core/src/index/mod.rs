//! AVL maintenance over the node store.
//!
//! Every traversal re-resolves nodes by identifier through one point-read
//! per step; no snapshot is ever reused across a mutation. The ordering
//! oracle is consulted only by the search walkers; rotation and rebalancing
//! are purely structural, driven by stored heights.

mod height;
mod node;
mod rebalance;
mod rotate;
mod search;
mod store;


pub use height::{HeightStart, height, propagate_heights};
pub use node::{IndexName, IndexNode, NodeId, RecordId, Side};
pub use rebalance::{RebalanceOutcome, RotationKind, rebalance};
pub use rotate::{rotate_left, rotate_right};
pub use search::{Relation, SearchError, search, search_range, search_relational};
pub use store::{MemoryNodeStore, NodePatch, NodeStore, StoreError};

use crate::obs::sink::{MetricsEvent, record};
use thiserror::Error as ThisError;

///
/// TreeError
///
/// Structural failures during rotation, rebalancing, or height propagation.
/// All fatal to the operation in progress; none are retried, since every
/// one of them signals a logic fault or a corrupted tree rather than a
/// transient condition.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum TreeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored left/right/parent link points at a document that does not
    /// resolve. Never silently skipped.
    #[error("dangling node reference: {id}")]
    DanglingReference { id: NodeId },

    /// An operation entry point was handed an id that resolves to nothing.
    #[error("no node with id {id}")]
    MissingNode { id: NodeId },

    /// Rotation pivot lacks the child the rotation hinges on. Rotations are
    /// only invoked after confirming imbalance, which implies the child
    /// exists; hitting this means the heights lied.
    #[error("rotation pivot {id} has no {side} child")]
    MissingRotationPrecondition { id: NodeId, side: Side },
}

/// Point-read an operation's entry node.
pub(in crate::index) fn fetch_entry(
    store: &impl NodeStore,
    id: NodeId,
) -> Result<IndexNode, TreeError> {
    record(MetricsEvent::StoreRead);
    store.get(id)?.ok_or(TreeError::MissingNode { id })
}

/// Point-read a node reached through a stored link.
pub(in crate::index) fn fetch_link(
    store: &impl NodeStore,
    id: NodeId,
) -> Result<IndexNode, TreeError> {
    record(MetricsEvent::StoreRead);
    store.get(id)?.ok_or(TreeError::DanglingReference { id })
}

/// Point-read an optional stored link.
pub(in crate::index) fn fetch_link_opt(
    store: &impl NodeStore,
    id: Option<NodeId>,
) -> Result<Option<IndexNode>, TreeError> {
    id.map(|id| fetch_link(store, id)).transpose()
}

/// Point-write one partial merge. An unknown id here means a link we just
/// followed vanished, which is the same corruption a dangling read signals.
pub(in crate::index) fn apply_patch(
    store: &mut impl NodeStore,
    id: NodeId,
    patch: NodePatch,
) -> Result<(), TreeError> {
    record(MetricsEvent::StoreWrite);
    store.apply(id, patch).map_err(|err| match err {
        StoreError::UnknownId { id } => TreeError::DanglingReference { id },
        other => TreeError::Store(other),
    })
}
