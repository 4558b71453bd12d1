//! ## Crate layout
//! - `core`: comparison oracle, node store seam, and AVL maintenance.
//! - `error`: shared error taxonomy over the runtime error types.
//!
//! The `prelude` module mirrors the surface an embedder touches: ciphertext
//! types, node documents, the store seam, and the tree operations.

pub use oredb_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        MAX_DOMAIN_SIZE,
        index::{
            HeightStart, IndexName, IndexNode, MemoryNodeStore, NodeId, NodePatch, NodeStore,
            RebalanceOutcome, RecordId, Relation, RotationKind, height, propagate_heights,
            rebalance, rotate_left, rotate_right, search, search_range, search_relational,
        },
        ore::{QueryCiphertext, StoredCiphertext, Verdict, compare},
    };
    pub use crate::error::{Error, ErrorKind, ErrorOrigin};
    pub use serde::{Deserialize, Serialize};
}
