//! Node store seam.
//!
//! The substrate that holds node documents is external; tree maintenance
//! only assumes key-addressed point-gets, partial point-updates, and one
//! predicate scan for root discovery. [`MemoryNodeStore`] is the bundled
//! implementation used by tests and embedders without a backing database.

use crate::index::node::{IndexName, IndexNode, NodeId};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("no node with id {id} to update")]
    UnknownId { id: NodeId },

    #[error("node {id} already exists")]
    DuplicateId { id: NodeId },
}

///
/// NodePatch
///
/// Partial field merge for one point-update. The outer `Option` means
/// "leave the field alone"; for link fields the inner `Option` is the stored
/// value, so a patch can explicitly null a link.
///
/// `ciphertext` and `refs` are deliberately absent: tree maintenance never
/// rewrites them.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodePatch {
    pub left: Option<Option<NodeId>>,
    pub right: Option<Option<NodeId>>,
    pub parent: Option<Option<NodeId>>,
    pub height: Option<u32>,
    pub is_root: Option<bool>,
}

impl NodePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn left(mut self, link: Option<NodeId>) -> Self {
        self.left = Some(link);
        self
    }

    #[must_use]
    pub const fn right(mut self, link: Option<NodeId>) -> Self {
        self.right = Some(link);
        self
    }

    #[must_use]
    pub const fn parent(mut self, link: Option<NodeId>) -> Self {
        self.parent = Some(link);
        self
    }

    #[must_use]
    pub const fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub const fn is_root(mut self, is_root: bool) -> Self {
        self.is_root = Some(is_root);
        self
    }

    /// Merge the patched fields into `node`, leaving the rest untouched.
    pub fn apply_to(&self, node: &mut IndexNode) {
        if let Some(link) = self.left {
            node.left = link;
        }
        if let Some(link) = self.right {
            node.right = link;
        }
        if let Some(link) = self.parent {
            node.parent = link;
        }
        if let Some(height) = self.height {
            node.height = height;
        }
        if let Some(is_root) = self.is_root {
            node.is_root = is_root;
        }
    }
}

///
/// NodeStore
///
/// Key-addressed document substrate. Every call is one independent point
/// operation; nothing here is transactional, so a rotation's four writes
/// land one at a time (see the concurrency notes on `rotate_left`).
///

pub trait NodeStore {
    /// Point-read by id; `Ok(None)` when no such document exists.
    fn get(&self, id: NodeId) -> Result<Option<IndexNode>, StoreError>;

    /// Partial field merge against one document.
    fn apply(&mut self, id: NodeId, patch: NodePatch) -> Result<(), StoreError>;

    /// Predicate scan: the node carrying the root marker for `index`.
    fn root_of(&self, index: &IndexName) -> Result<Option<IndexNode>, StoreError>;

    /// Place a new document. Insertion wiring (placing a leaf and linking
    /// its parent) lives outside this crate but needs this to exist.
    fn insert(&mut self, node: IndexNode) -> Result<(), StoreError>;
}

///
/// MemoryNodeStore
///

#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: BTreeMap<NodeId, IndexNode>,
}

impl MemoryNodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate every stored node, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &IndexNode> {
        self.nodes.values()
    }

    /// Direct access for fixtures that play the external inserter (ref
    /// accumulation on duplicate keys is not a tree-maintenance patch).
    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut IndexNode> {
        self.nodes.get_mut(&id)
    }
}

impl NodeStore for MemoryNodeStore {
    fn get(&self, id: NodeId) -> Result<Option<IndexNode>, StoreError> {
        Ok(self.nodes.get(&id).cloned())
    }

    fn apply(&mut self, id: NodeId, patch: NodePatch) -> Result<(), StoreError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(StoreError::UnknownId { id })?;
        patch.apply_to(node);

        Ok(())
    }

    fn root_of(&self, index: &IndexName) -> Result<Option<IndexNode>, StoreError> {
        Ok(self
            .nodes
            .values()
            .find(|node| node.is_root && node.index == *index)
            .cloned())
    }

    fn insert(&mut self, node: IndexNode) -> Result<(), StoreError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(StoreError::DuplicateId { id });
        }
        self.nodes.insert(id, node);

        Ok(())
    }
}

///
/// TESTS
///
