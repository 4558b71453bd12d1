use derive_more::Display;
use oredb_core::{
    index::{SearchError, StoreError, TreeError},
    ore::MalformedCiphertext,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable class + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<MalformedCiphertext> for Error {
    fn from(err: MalformedCiphertext) -> Self {
        Self::new(ErrorKind::Ciphertext, ErrorOrigin::Oracle, err.to_string())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::UnknownId { .. } => StoreErrorKind::NotFound,
            StoreError::DuplicateId { .. } => StoreErrorKind::Conflict,
        };

        Self::new(ErrorKind::Store(kind), ErrorOrigin::Store, err.to_string())
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Store(err) => err.into(),

            TreeError::MissingNode { .. } => Self::new(
                ErrorKind::Tree(TreeErrorKind::NotFound),
                ErrorOrigin::Tree,
                err.to_string(),
            ),

            TreeError::DanglingReference { .. }
            | TreeError::MissingRotationPrecondition { .. } => Self::new(
                ErrorKind::Tree(TreeErrorKind::Corrupted),
                ErrorOrigin::Tree,
                err.to_string(),
            ),
        }
    }
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Ciphertext(err) => err.into(),
            SearchError::Tree(err) => err.into(),
        }
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// A ciphertext failed shape validation before comparison.
    Ciphertext,
    Store(StoreErrorKind),
    Tree(TreeErrorKind),
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Point operation addressed a node that does not exist.
    NotFound,

    /// Insertion collided with an existing node id.
    Conflict,
}

///
/// TreeErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TreeErrorKind {
    /// An operation was started from a node that does not exist.
    NotFound,

    /// A link or precondition the tree relies on did not hold; the stored
    /// tree needs repair before further maintenance.
    Corrupted,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Oracle,
    Store,
    Tree,
}

///
/// TESTS
///
