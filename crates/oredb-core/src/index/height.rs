//! Height bookkeeping.
//!
//! Heights are maintained incrementally, never recomputed over the whole
//! tree: each helper recomputes one node from its (freshly fetched)
//! children and persists the result.

use crate::index::{
    NodePatch, NodeStore, TreeError, apply_patch, fetch_entry, fetch_link, fetch_link_opt,
    node::{IndexName, IndexNode, NodeId},
};
use crate::obs::sink::{MetricsEvent, record};

/// Height of a node reference; an absent reference counts as zero.
#[must_use]
pub fn height(node: Option<&IndexNode>) -> u32 {
    node.map_or(0, |node| node.height)
}

///
/// HeightStart
///
/// Where a propagation walk begins: just above a named node, or at a tree's
/// designated root.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HeightStart {
    Node(NodeId),
    Root(IndexName),
}

/// Recompute and persist `height = 1 + max(child heights)` from the start
/// point up through every ancestor.
///
/// Idempotent: with no structural change in between, a second walk writes
/// the same values. Used when a structural change does not itself require a
/// rotation.
pub fn propagate_heights(store: &mut impl NodeStore, from: HeightStart) -> Result<(), TreeError> {
    let mut cursor = match from {
        HeightStart::Node(id) => {
            let node = fetch_entry(store, id)?;
            fetch_link_opt(store, node.parent)?
        }
        HeightStart::Root(index) => {
            record(MetricsEvent::StoreRead);
            store.root_of(&index)?
        }
    };

    while let Some(node) = cursor {
        let left = fetch_link_opt(store, node.left)?;
        let right = fetch_link_opt(store, node.right)?;
        let new_height = 1 + height(left.as_ref()).max(height(right.as_ref()));
        apply_patch(store, node.id, NodePatch::new().height(new_height))?;

        cursor = match node.parent {
            Some(parent_id) => Some(fetch_link(store, parent_id)?),
            None => None,
        };
    }

    Ok(())
}

///
/// TESTS
///
