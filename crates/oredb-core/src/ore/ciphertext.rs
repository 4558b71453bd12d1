//! Wire shapes for the two halves of an order-revealing comparison.
//!
//! Both are produced by client-side encryption and are opaque to the tree
//! maintenance logic; this module only validates structure, never derives
//! key material.

use crate::MAX_DOMAIN_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// MalformedCiphertext
///
/// Structural defects that make a single comparison impossible. Always fatal
/// to the comparison in progress; never retried, never degraded.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MalformedCiphertext {
    #[error("query material is empty")]
    EmptyMaterial,

    #[error("stored nonce is empty")]
    EmptyNonce,

    #[error("tag array has {len} trits but the query addresses domain index {domain_index}")]
    TagIndexOutOfRange { domain_index: u32, len: usize },

    #[error("tag at domain index {domain_index} is not a trit: {tag}")]
    InvalidTag { domain_index: u32, tag: u8 },

    #[error("tag array exceeds max domain size: {len} (limit {MAX_DOMAIN_SIZE})")]
    DomainTooLarge { len: usize },
}

///
/// QueryCiphertext
///
/// The comparison token a client derives for one value: the PRF material for
/// that value's domain position, and the position itself. The oracle must
/// only ever be evaluated at `domain_index`; tags at any other position are
/// statistically unrelated to this material.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QueryCiphertext {
    #[serde(with = "serde_bytes")]
    pub material: Vec<u8>,
    pub domain_index: u32,
}

impl QueryCiphertext {
    #[must_use]
    pub const fn new(material: Vec<u8>, domain_index: u32) -> Self {
        Self {
            material,
            domain_index,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), MalformedCiphertext> {
        if self.material.is_empty() {
            return Err(MalformedCiphertext::EmptyMaterial);
        }

        Ok(())
    }
}

///
/// StoredCiphertext
///
/// The persisted half: a per-node nonce and one blinded trit per domain
/// value. `tags[j]` unblinds to the three-way relation of `j` against the
/// node's true value only under the query material for position `j`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StoredCiphertext {
    #[serde(with = "serde_bytes")]
    pub nonce: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub tags: Vec<u8>,
}

impl StoredCiphertext {
    #[must_use]
    pub const fn new(nonce: Vec<u8>, tags: Vec<u8>) -> Self {
        Self { nonce, tags }
    }

    pub(crate) fn validate(&self) -> Result<(), MalformedCiphertext> {
        if self.nonce.is_empty() {
            return Err(MalformedCiphertext::EmptyNonce);
        }
        if self.tags.len() > MAX_DOMAIN_SIZE {
            return Err(MalformedCiphertext::DomainTooLarge {
                len: self.tags.len(),
            });
        }

        Ok(())
    }

    /// The blinded trit at the query's domain position.
    pub(crate) fn tag_at(&self, domain_index: u32) -> Result<u8, MalformedCiphertext> {
        let tag = self
            .tags
            .get(domain_index as usize)
            .copied()
            .ok_or(MalformedCiphertext::TagIndexOutOfRange {
                domain_index,
                len: self.tags.len(),
            })?;

        if tag > 2 {
            return Err(MalformedCiphertext::InvalidTag { domain_index, tag });
        }

        Ok(tag)
    }
}

///
/// TESTS
///
