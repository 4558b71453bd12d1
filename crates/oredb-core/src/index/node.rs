//! Node documents and their identifiers.
//!
//! The tree is a back-referencing graph (parent plus children), so it is
//! represented as an arena of documents keyed by [`NodeId`], with every link
//! stored as an identifier rather than a native reference.

use crate::ore::StoredCiphertext;
use derive_more::{Deref, Display, FromStr};
use serde::{Deserialize, Serialize, Serializer, de::Deserializer};
use std::str::FromStr;
use ulid::Ulid;

///
/// NodeId
///
/// Identifier of one index node document.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct NodeId(Ulid);

impl NodeId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Ulid(value))
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buffer = [0; ulid::ULID_LEN];
        let text = self.array_to_str(&mut buffer);
        text.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_str(&text).map_err(serde::de::Error::custom)
    }
}

///
/// RecordId
///
/// Identifier of a data record referenced by a node. Opaque to tree logic;
/// searches return these, nothing in this crate dereferences them.
///

#[derive(Clone, Copy, Debug, Deref, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct RecordId(Ulid);

impl RecordId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Ulid(value))
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut buffer = [0; ulid::ULID_LEN];
        let text = self.array_to_str(&mut buffer);
        text.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::from_str(&text).map_err(serde::de::Error::custom)
    }
}

///
/// IndexName
///
/// Logical tree scope. One store may hold several trees; every node carries
/// the name of the tree it belongs to, and root discovery is always scoped
/// by it.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct IndexName(String);

impl IndexName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for IndexName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

///
/// Side
///
/// Which child slot of a parent a node occupies.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

///
/// IndexNode
///
/// One AVL node document. `ciphertext` is opaque to tree maintenance beyond
/// being handed to the ordering oracle; `refs` are the data records whose
/// encrypted field equals this node's key.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexNode {
    pub id: NodeId,
    pub index: IndexName,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub height: u32,
    pub is_root: bool,
    pub ciphertext: StoredCiphertext,
    pub refs: Vec<RecordId>,
}

impl IndexNode {
    /// A freshly inserted leaf: height 1, no links, not the root.
    #[must_use]
    pub fn new_leaf(
        id: NodeId,
        index: IndexName,
        ciphertext: StoredCiphertext,
        record: RecordId,
    ) -> Self {
        Self {
            id,
            index,
            left: None,
            right: None,
            parent: None,
            height: 1,
            is_root: false,
            ciphertext,
            refs: vec![record],
        }
    }

    /// Which side `child` occupies on this node.
    ///
    /// A child id that is not linked here reports [`Side::Right`]; that case
    /// is only reachable on a tree whose parent/child symmetry is already
    /// broken.
    #[must_use]
    pub(crate) fn side_of(&self, child: NodeId) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

///
/// TESTS
///
