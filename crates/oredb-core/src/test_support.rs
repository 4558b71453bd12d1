//! Shared fixtures: a deterministic ORE encryptor and an oracle-driven
//! inserter playing the role of the external insertion wiring.
//!
//! The encryptor mirrors the client side of the difference-reveal scheme:
//! `tags[j] = (cmp(j, value) + pad(material_j, nonce)) mod 3`, with one PRF
//! material per domain position, so the oracle behaves as a total order
//! proxy over plaintext values.

use crate::{
    index::{
        HeightStart, IndexName, IndexNode, MemoryNodeStore, NodeId, NodePatch, NodeStore,
        RebalanceOutcome, RecordId, height, propagate_heights, rebalance,
    },
    ore::{self, QueryCiphertext, StoredCiphertext, Verdict},
};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::BTreeMap;

///
/// TestOreKey
///

pub(crate) struct TestOreKey {
    secret: Vec<u8>,
    domain: u32,
}

impl TestOreKey {
    pub(crate) fn new(secret: &[u8], domain: u32) -> Self {
        Self {
            secret: secret.to_vec(),
            domain,
        }
    }

    /// PRF material for one domain position.
    fn material(&self, position: u32) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(position.to_be_bytes());
        hasher.finalize().to_vec()
    }

    pub(crate) fn query(&self, value: u32) -> QueryCiphertext {
        QueryCiphertext::new(self.material(value), value)
    }

    pub(crate) fn encrypt(&self, value: u32, nonce: &[u8]) -> StoredCiphertext {
        let mut tags = Vec::with_capacity(self.domain as usize);
        for position in 0..self.domain {
            let relation: u8 = match position.cmp(&value) {
                Ordering::Equal => 0,
                Ordering::Greater => 1,
                Ordering::Less => 2,
            };
            let pad = ore::blinding_pad(&self.material(position), nonce);
            tags.push((relation + pad) % 3);
        }

        StoredCiphertext::new(nonce.to_vec(), tags)
    }
}

///
/// TreeFixture
///
/// An in-memory tree plus the bookkeeping to translate node and record ids
/// back to the plaintext values the tests reason about.
///

pub(crate) struct TreeFixture {
    pub(crate) store: MemoryNodeStore,
    pub(crate) key: TestOreKey,
    pub(crate) index: IndexName,
    node_values: BTreeMap<NodeId, u32>,
    record_values: BTreeMap<RecordId, u32>,
    next_node: u128,
    next_record: u128,
}

impl TreeFixture {
    pub(crate) fn new(name: &str, domain: u32) -> Self {
        Self {
            store: MemoryNodeStore::new(),
            key: TestOreKey::new(b"fixture-secret", domain),
            index: IndexName::from(name),
            node_values: BTreeMap::new(),
            record_values: BTreeMap::new(),
            next_node: 1,
            next_record: 1,
        }
    }

    pub(crate) fn with_values(name: &str, domain: u32, values: &[u32]) -> Self {
        let mut fixture = Self::new(name, domain);
        for value in values {
            fixture.insert(*value);
        }

        fixture
    }

    /// Full insertion flow: place the leaf, refresh heights along its path,
    /// rebalance, and repair heights above a rotation point.
    pub(crate) fn insert(&mut self, value: u32) -> RebalanceOutcome {
        let Some(leaf_id) = self.place_leaf(value) else {
            // Duplicate key: a ref was appended, no structural change.
            return RebalanceOutcome::AlreadyBalanced;
        };

        propagate_heights(&mut self.store, HeightStart::Node(leaf_id))
            .expect("height walk after insertion");
        let outcome = rebalance(&mut self.store, leaf_id).expect("rebalance after insertion");
        if let RebalanceOutcome::Rotated { subtree_root, .. } = outcome {
            propagate_heights(&mut self.store, HeightStart::Node(subtree_root))
                .expect("height repair above the rotation");
        }

        outcome
    }

    /// Place a leaf and refresh heights, skipping rebalancing. For tests
    /// that need a deliberately lopsided tree to rotate by hand.
    pub(crate) fn insert_unbalanced(&mut self, value: u32) {
        if let Some(leaf_id) = self.place_leaf(value) {
            propagate_heights(&mut self.store, HeightStart::Node(leaf_id))
                .expect("height walk after insertion");
        }
    }

    /// Oracle-driven leaf placement. Returns the new leaf's id, or `None`
    /// when the value was already present and only a ref was appended.
    fn place_leaf(&mut self, value: u32) -> Option<NodeId> {
        let node_id = NodeId::from_u128(self.next_node);
        let record_id = RecordId::from_u128(self.next_record);
        let nonce = format!("nonce-{}-{}", self.next_node, value).into_bytes();
        let ciphertext = self.key.encrypt(value, &nonce);
        let query = self.key.query(value);

        let Some(mut cursor) = self
            .store
            .root_of(&self.index)
            .expect("root scan")
        else {
            let mut root = IndexNode::new_leaf(node_id, self.index.clone(), ciphertext, record_id);
            root.is_root = true;
            self.store.insert(root).expect("insert root");
            self.remember(node_id, record_id, value);
            return Some(node_id);
        };

        loop {
            let verdict =
                ore::compare(&query, &cursor.ciphertext).expect("well-formed comparison");
            let side = match verdict {
                Verdict::Equal => {
                    let node = self
                        .store
                        .node_mut(cursor.id)
                        .expect("node just fetched");
                    node.refs.push(record_id);
                    self.record_values.insert(record_id, value);
                    self.next_record += 1;
                    return None;
                }
                Verdict::Greater => cursor.right,
                Verdict::Less => cursor.left,
            };

            match side {
                Some(child_id) => {
                    cursor = self
                        .store
                        .get(child_id)
                        .expect("point read")
                        .expect("linked child resolves");
                }
                None => {
                    let mut leaf =
                        IndexNode::new_leaf(node_id, self.index.clone(), ciphertext, record_id);
                    leaf.parent = Some(cursor.id);
                    self.store.insert(leaf).expect("insert leaf");

                    let link = match verdict {
                        Verdict::Greater => NodePatch::new().right(Some(node_id)),
                        _ => NodePatch::new().left(Some(node_id)),
                    };
                    self.store.apply(cursor.id, link).expect("link parent");
                    self.remember(node_id, record_id, value);
                    return Some(node_id);
                }
            }
        }
    }

    fn remember(&mut self, node_id: NodeId, record_id: RecordId, value: u32) {
        self.node_values.insert(node_id, value);
        self.record_values.insert(record_id, value);
        self.next_node += 1;
        self.next_record += 1;
    }

    pub(crate) fn root(&self) -> Option<IndexNode> {
        self.store.root_of(&self.index).expect("root scan")
    }

    pub(crate) fn node_id_of(&self, value: u32) -> Option<NodeId> {
        self.node_values
            .iter()
            .find(|(_, v)| **v == value)
            .map(|(id, _)| *id)
    }

    pub(crate) fn node_of(&self, value: u32) -> IndexNode {
        let id = self.node_id_of(value).expect("value has a node");
        self.node_of_id(id)
    }

    pub(crate) fn node_of_id(&self, id: NodeId) -> IndexNode {
        self.store
            .get(id)
            .expect("point read")
            .expect("node resolves")
    }

    pub(crate) fn value_of(&self, id: NodeId) -> u32 {
        self.node_values[&id]
    }

    /// Translate record refs back to plaintext values, sorted.
    pub(crate) fn values_of_refs(&self, refs: &[RecordId]) -> Vec<u32> {
        let mut values: Vec<u32> = refs.iter().map(|r| self.record_values[r]).collect();
        values.sort_unstable();
        values
    }
}

/// `(value, parent, left, right, height)` per node, sorted by value.
/// Structural fingerprint for round-trip assertions.
pub(crate) fn shape_by_value(
    fixture: &TreeFixture,
) -> Vec<(u32, Option<u32>, Option<u32>, Option<u32>, u32)> {
    let value_of = |id: Option<NodeId>| id.map(|id| fixture.value_of(id));
    let mut shape: Vec<_> = fixture
        .store
        .nodes()
        .map(|node| {
            (
                fixture.value_of(node.id),
                value_of(node.parent),
                value_of(node.left),
                value_of(node.right),
                node.height,
            )
        })
        .collect();
    shape.sort_unstable();

    shape
}

/// `(value, height)` per node, sorted by value.
pub(crate) fn heights_by_value(fixture: &TreeFixture) -> Vec<(u32, u32)> {
    let mut heights: Vec<_> = fixture
        .store
        .nodes()
        .map(|node| (fixture.value_of(node.id), node.height))
        .collect();
    heights.sort_unstable();

    heights
}

/// Check linkage symmetry, incremental heights, root marker uniqueness,
/// and (optionally) the AVL balance bound over the whole store.
pub(crate) fn assert_tree_invariants(fixture: &TreeFixture, check_balance: bool) {
    let store = &fixture.store;
    let mut roots = 0;

    for node in store.nodes() {
        let left = node
            .left
            .map(|id| store.get(id).expect("point read").expect("left resolves"));
        let right = node
            .right
            .map(|id| store.get(id).expect("point read").expect("right resolves"));

        let expected = 1 + height(left.as_ref()).max(height(right.as_ref()));
        assert_eq!(
            node.height,
            expected,
            "height of node {} (value {}) is stale",
            node.id,
            fixture.value_of(node.id),
        );

        if check_balance {
            let balance = i64::from(height(right.as_ref())) - i64::from(height(left.as_ref()));
            assert!(
                (-1..=1).contains(&balance),
                "node {} (value {}) is unbalanced: {balance}",
                node.id,
                fixture.value_of(node.id),
            );
        }

        for child in [left.as_ref(), right.as_ref()].into_iter().flatten() {
            assert_eq!(
                child.parent,
                Some(node.id),
                "child {} does not point back at parent {}",
                child.id,
                node.id,
            );
        }

        if let Some(parent_id) = node.parent {
            let parent = store
                .get(parent_id)
                .expect("point read")
                .expect("parent resolves");
            assert!(
                parent.left == Some(node.id) || parent.right == Some(node.id),
                "parent {} does not link child {}",
                parent.id,
                node.id,
            );
        }

        if node.is_root {
            roots += 1;
            assert!(node.parent.is_none(), "root marker on a linked node");
        }
    }

    if store.is_empty() {
        assert_eq!(roots, 0);
    } else {
        assert_eq!(roots, 1, "exactly one node must carry the root marker");
    }
}
