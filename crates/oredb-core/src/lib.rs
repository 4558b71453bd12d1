//! Core runtime for OreDB: the order-revealing comparison oracle and the
//! AVL maintenance algorithms (rotation, rebalancing, height propagation,
//! search) that run against a key-addressed node store.
//!
//! Tree logic never sees a plaintext key. The only ordering primitive is
//! [`ore::compare`], and every node access is an independent point-read or
//! point-write through the [`index::NodeStore`] seam.
#![warn(unreachable_pub)]

pub mod index;
pub mod obs;
pub mod ore;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of trits a stored ciphertext may carry.
///
/// The tag array spans the full value domain, so this bounds the domain size
/// a single index accepts and keeps node documents within storable sizes.
pub const MAX_DOMAIN_SIZE: usize = 65_536;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, sinks, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        index::{IndexName, IndexNode, NodeId, RecordId},
        ore::{QueryCiphertext, StoredCiphertext, Verdict},
    };
}
