//! Single tree rotations.
//!
//! Each rotation is exactly four independent point-updates against the node
//! store, in the same order the writes land: inner grandchild, old parent,
//! pivot, promoted child. There is no cross-node transaction, so a reader
//! racing these writes can observe a transiently asymmetric tree; callers
//! needing atomicity serialize externally.
//!
//! Rotations never touch the root marker. When the pivot was the tree root,
//! relocating `is_root` onto the promoted child is the caller's explicit
//! responsibility (the rebalancer does this).

use crate::index::{
    NodePatch, NodeStore, TreeError, apply_patch, fetch_entry, fetch_link, fetch_link_opt, height,
    node::{NodeId, Side},
};
use crate::obs::sink::{MetricsEvent, RotationDirection, record};

/// Rotate left around `node_id`: the right child is promoted, the pivot
/// becomes its left child, and the promoted child's old left subtree is
/// re-hung under the pivot.
pub fn rotate_left(store: &mut impl NodeStore, node_id: NodeId) -> Result<(), TreeError> {
    let node = fetch_entry(store, node_id)?;
    let Some(promoted_id) = node.right else {
        return Err(TreeError::MissingRotationPrecondition {
            id: node_id,
            side: Side::Right,
        });
    };
    let promoted = fetch_link(store, promoted_id)?;

    // 1. The promoted child's left subtree moves under the pivot.
    if let Some(inner_id) = promoted.left {
        apply_patch(store, inner_id, NodePatch::new().parent(Some(node.id)))?;
    }

    // 2. The pivot's old parent adopts the promoted child on the side the
    //    pivot occupied.
    if let Some(parent_id) = node.parent {
        let parent = fetch_link(store, parent_id)?;
        let patch = match parent.side_of(node.id) {
            Side::Left => NodePatch::new().left(Some(promoted_id)),
            Side::Right => NodePatch::new().right(Some(promoted_id)),
        };
        apply_patch(store, parent.id, patch)?;
    }

    // 3. The pivot: right link becomes the inner subtree, parent becomes
    //    the promoted child, height recomputed from its two new children.
    let pivot_left = fetch_link_opt(store, node.left)?;
    let inner = fetch_link_opt(store, promoted.left)?;
    let pivot_height = 1 + height(pivot_left.as_ref()).max(height(inner.as_ref()));
    apply_patch(
        store,
        node.id,
        NodePatch::new()
            .right(promoted.left)
            .parent(Some(promoted_id))
            .height(pivot_height),
    )?;

    // 4. The promoted child: adopts the pivot, takes the pivot's old parent
    //    (captured before step 3 overwrote it), height recomputed from the
    //    freshly written pivot and its own right subtree.
    let pivot_now = fetch_link(store, node.id)?;
    let outer = fetch_link_opt(store, promoted.right)?;
    let promoted_height = 1 + height(Some(&pivot_now)).max(height(outer.as_ref()));
    apply_patch(
        store,
        promoted_id,
        NodePatch::new()
            .left(Some(node.id))
            .parent(node.parent)
            .height(promoted_height),
    )?;

    record(MetricsEvent::Rotation {
        direction: RotationDirection::Left,
    });

    Ok(())
}

/// Rotate right around `node_id`. Exact mirror of [`rotate_left`], pivoting
/// on the left child.
pub fn rotate_right(store: &mut impl NodeStore, node_id: NodeId) -> Result<(), TreeError> {
    let node = fetch_entry(store, node_id)?;
    let Some(promoted_id) = node.left else {
        return Err(TreeError::MissingRotationPrecondition {
            id: node_id,
            side: Side::Left,
        });
    };
    let promoted = fetch_link(store, promoted_id)?;

    if let Some(inner_id) = promoted.right {
        apply_patch(store, inner_id, NodePatch::new().parent(Some(node.id)))?;
    }

    if let Some(parent_id) = node.parent {
        let parent = fetch_link(store, parent_id)?;
        let patch = match parent.side_of(node.id) {
            Side::Left => NodePatch::new().left(Some(promoted_id)),
            Side::Right => NodePatch::new().right(Some(promoted_id)),
        };
        apply_patch(store, parent.id, patch)?;
    }

    let inner = fetch_link_opt(store, promoted.right)?;
    let pivot_right = fetch_link_opt(store, node.right)?;
    let pivot_height = 1 + height(inner.as_ref()).max(height(pivot_right.as_ref()));
    apply_patch(
        store,
        node.id,
        NodePatch::new()
            .left(promoted.right)
            .parent(Some(promoted_id))
            .height(pivot_height),
    )?;

    let outer = fetch_link_opt(store, promoted.left)?;
    let pivot_now = fetch_link(store, node.id)?;
    let promoted_height = 1 + height(outer.as_ref()).max(height(Some(&pivot_now)));
    apply_patch(
        store,
        promoted_id,
        NodePatch::new()
            .right(Some(node.id))
            .parent(node.parent)
            .height(promoted_height),
    )?;

    record(MetricsEvent::Rotation {
        direction: RotationDirection::Right,
    });

    Ok(())
}

///
/// TESTS
///
