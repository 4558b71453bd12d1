//! Insertion rebalancing.
//!
//! Called once, immediately after a leaf lands in the store. A single
//! insertion can unbalance at most one node on the path from the new leaf
//! to the root; restoring balance there restores it everywhere above, so
//! the walk stops at the first imbalance it fixes. The ordering oracle is
//! never consulted here: rebalancing is purely structural.

use crate::index::{
    NodePatch, NodeStore, TreeError, apply_patch, fetch_entry, fetch_link, fetch_link_opt, height,
    node::{IndexNode, NodeId, Side},
    rotate::{rotate_left, rotate_right},
};

///
/// RotationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RotationKind {
    Left,
    Right,
    /// Left rotation of the left child, then right rotation of the node.
    LeftRight,
    /// Right rotation of the right child, then left rotation of the node.
    RightLeft,
}

///
/// RebalanceOutcome
///
/// What the walk did. `subtree_root` is the node that now roots the rotated
/// subtree; heights of ancestors above it reflect the pre-insertion state
/// and the inserter is expected to run `propagate_heights` from there if it
/// needs them exact before the next insertion's own walk repairs them.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RebalanceOutcome {
    AlreadyBalanced,
    Rotated {
        kind: RotationKind,
        subtree_root: NodeId,
    },
}

/// Ascend from the freshly inserted leaf at `start` toward the root and fix
/// the first unbalanced ancestor. At most one structural fix per call.
pub fn rebalance(
    store: &mut impl NodeStore,
    start: NodeId,
) -> Result<RebalanceOutcome, TreeError> {
    let leaf = fetch_entry(store, start)?;
    let mut cursor = fetch_link_opt(store, leaf.parent)?;

    while let Some(node) = cursor {
        let left = fetch_link_opt(store, node.left)?;
        let right = fetch_link_opt(store, node.right)?;
        let balance = balance_of(left.as_ref(), right.as_ref());

        if balance < -1 {
            // Left-heavy. A double rotation is needed when the left child
            // itself leans right.
            let Some(left) = left else {
                return Err(TreeError::MissingRotationPrecondition {
                    id: node.id,
                    side: Side::Left,
                });
            };

            let kind = if child_balance(store, &left)? > 0 {
                rotate_left(store, left.id)?;
                rotate_right(store, node.id)?;
                RotationKind::LeftRight
            } else {
                rotate_right(store, node.id)?;
                RotationKind::Right
            };

            let subtree_root = finish_rotation(store, &node)?;
            return Ok(RebalanceOutcome::Rotated { kind, subtree_root });
        } else if balance > 1 {
            // Right-heavy mirror.
            let Some(right) = right else {
                return Err(TreeError::MissingRotationPrecondition {
                    id: node.id,
                    side: Side::Right,
                });
            };

            let kind = if child_balance(store, &right)? < 0 {
                rotate_right(store, right.id)?;
                rotate_left(store, node.id)?;
                RotationKind::RightLeft
            } else {
                rotate_left(store, node.id)?;
                RotationKind::Left
            };

            let subtree_root = finish_rotation(store, &node)?;
            return Ok(RebalanceOutcome::Rotated { kind, subtree_root });
        }

        cursor = fetch_link_opt(store, node.parent)?;
    }

    Ok(RebalanceOutcome::AlreadyBalanced)
}

/// `height(right) − height(left)`; negative means left-heavy.
fn balance_of(left: Option<&IndexNode>, right: Option<&IndexNode>) -> i64 {
    i64::from(height(right)) - i64::from(height(left))
}

/// Balance of one child node, fetched fresh from the store.
fn child_balance(store: &impl NodeStore, node: &IndexNode) -> Result<i64, TreeError> {
    let left = fetch_link_opt(store, node.left)?;
    let right = fetch_link_opt(store, node.right)?;

    Ok(balance_of(left.as_ref(), right.as_ref()))
}

/// After a rotation demoted `node`, locate the subtree's new root and, when
/// the demoted node carried the tree's root marker, relocate it. The
/// rotation engine itself never touches the marker; this is the explicit
/// relocation step that keeps marker-based root discovery working.
fn finish_rotation(store: &mut impl NodeStore, node: &IndexNode) -> Result<NodeId, TreeError> {
    let demoted = fetch_link(store, node.id)?;
    let Some(subtree_root) = demoted.parent else {
        // A rotation always reparents its pivot.
        return Err(TreeError::DanglingReference { id: node.id });
    };

    if node.is_root {
        apply_patch(store, node.id, NodePatch::new().is_root(false))?;
        apply_patch(store, subtree_root, NodePatch::new().is_root(true))?;
    }

    Ok(subtree_root)
}

///
/// TESTS
///
