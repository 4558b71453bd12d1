//! Search walkers.
//!
//! The equality walker descends one child per verdict. The relational and
//! range walkers scan subtrees through a FIFO of pending nodes, pruning the
//! side each verdict excludes; every visited node costs one fresh oracle
//! evaluation, so pruning is what keeps these sublinear on balanced trees.

use crate::index::{
    NodeStore, TreeError, fetch_link, fetch_link_opt,
    node::{IndexName, IndexNode, NodeId, RecordId},
};
use crate::obs::sink::{MetricsEvent, record};
use crate::ore::{self, MalformedCiphertext, QueryCiphertext, Verdict};
use std::collections::VecDeque;
use thiserror::Error as ThisError;

///
/// SearchError
///
/// A search fails only on malformed input or a corrupted tree. "No match"
/// is a normal outcome, not an error.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SearchError {
    #[error("malformed ciphertext: {0}")]
    Ciphertext(#[from] MalformedCiphertext),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

///
/// Relation
///
/// Which stored keys a relational scan returns, relative to the query.
/// Strict in both directions: keys equal to the query are excluded.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    Greater,
    Less,
}

/// Equality lookup: descend from the tree's marked root until a node
/// compares equal or the tree runs out.
pub fn search(
    store: &impl NodeStore,
    index: &IndexName,
    query: &QueryCiphertext,
) -> Result<Option<IndexNode>, SearchError> {
    record(MetricsEvent::StoreRead);
    let mut cursor = store.root_of(index).map_err(TreeError::from)?;

    while let Some(node) = cursor {
        record(MetricsEvent::SearchStep);
        cursor = match ore::compare(query, &node.ciphertext)? {
            Verdict::Equal => return Ok(Some(node)),
            Verdict::Greater => fetch_link_opt(store, node.right)?,
            Verdict::Less => fetch_link_opt(store, node.left)?,
        };
    }

    Ok(None)
}

/// Collect the record refs of every node strictly greater (or strictly
/// less) than the query.
pub fn search_relational(
    store: &impl NodeStore,
    index: &IndexName,
    query: &QueryCiphertext,
    relation: Relation,
) -> Result<Vec<RecordId>, SearchError> {
    let mut results = Vec::new();
    let mut pending = VecDeque::new();

    record(MetricsEvent::StoreRead);
    if let Some(root) = store.root_of(index).map_err(TreeError::from)? {
        pending.push_back(root);
    }

    while let Some(node) = pending.pop_front() {
        record(MetricsEvent::SearchStep);
        let verdict = ore::compare(query, &node.ciphertext)?;

        match relation {
            // Query < node means the node's key is greater: it qualifies,
            // and both subtrees may hold more qualifiers. Otherwise only
            // the right subtree can.
            Relation::Greater => {
                if verdict == Verdict::Less {
                    results.extend_from_slice(&node.refs);
                    enqueue_child(store, &mut pending, node.left)?;
                    enqueue_child(store, &mut pending, node.right)?;
                } else {
                    enqueue_child(store, &mut pending, node.right)?;
                }
            }
            Relation::Less => {
                if verdict == Verdict::Greater {
                    results.extend_from_slice(&node.refs);
                    enqueue_child(store, &mut pending, node.left)?;
                    enqueue_child(store, &mut pending, node.right)?;
                } else {
                    enqueue_child(store, &mut pending, node.left)?;
                }
            }
        }
    }

    Ok(results)
}

/// Collect the record refs of every node whose key lies in the closed
/// interval `[low, high]`. Two oracle evaluations per visited node, one
/// against each bound.
pub fn search_range(
    store: &impl NodeStore,
    index: &IndexName,
    low: &QueryCiphertext,
    high: &QueryCiphertext,
) -> Result<Vec<RecordId>, SearchError> {
    let mut results = Vec::new();
    let mut pending = VecDeque::new();

    record(MetricsEvent::StoreRead);
    if let Some(root) = store.root_of(index).map_err(TreeError::from)? {
        pending.push_back(root);
    }

    while let Some(node) = pending.pop_front() {
        record(MetricsEvent::SearchStep);
        let low_verdict = ore::compare(low, &node.ciphertext)?;
        let high_verdict = ore::compare(high, &node.ciphertext)?;

        match (low_verdict, high_verdict) {
            // Node sits on the low bound: everything qualifying is here or
            // to the right.
            (Verdict::Equal, _) => {
                results.extend_from_slice(&node.refs);
                enqueue_child(store, &mut pending, node.right)?;
            }
            // Node sits on the high bound.
            (_, Verdict::Equal) => {
                results.extend_from_slice(&node.refs);
                enqueue_child(store, &mut pending, node.left)?;
            }
            // Strictly inside the interval.
            (Verdict::Less, Verdict::Greater) => {
                results.extend_from_slice(&node.refs);
                enqueue_child(store, &mut pending, node.left)?;
                enqueue_child(store, &mut pending, node.right)?;
            }
            // Node below the interval.
            (Verdict::Greater, Verdict::Greater) => {
                enqueue_child(store, &mut pending, node.right)?;
            }
            // Node above the interval.
            (Verdict::Less, Verdict::Less) => {
                enqueue_child(store, &mut pending, node.left)?;
            }
            // Inverted bounds exclude everything.
            (Verdict::Greater, Verdict::Less) => {}
        }
    }

    Ok(results)
}

fn enqueue_child(
    store: &impl NodeStore,
    pending: &mut VecDeque<IndexNode>,
    id: Option<NodeId>,
) -> Result<(), TreeError> {
    if let Some(id) = id {
        pending.push_back(fetch_link(store, id)?);
    }

    Ok(())
}

///
/// TESTS
///
