use thiserror::Error;

use bedtree_core::BedError;
use bedtree_core::models::Entry;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Cannot build an index from zero entries")]
    EmptyInput,

    #[error("Invalid entry ({entry}): {reason}")]
    InvalidEntry { entry: Entry, reason: String },

    #[error("Corrupted index: {0}")]
    Deserialization(#[from] DeserializationError),

    #[error("Unknown index format: {0}")]
    UnknownFormat(String),

    #[error("Error reading BED data: {0}")]
    Bed(#[from] BedError),

    #[error("Cannot encode index as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot encode index as bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Problems found while loading a persisted tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeserializationError {
    /// The bytes do not decode into the node schema: truncated, missing fields, wrong types.
    #[error("malformed index data: {0}")]
    Malformed(String),

    #[error("node {entry}: recorded size {recorded} but subtree holds {actual} nodes")]
    SizeMismatch {
        entry: Entry,
        recorded: usize,
        actual: usize,
    },

    #[error("node {entry}: {found} precomputed children for a subtree of {expected}")]
    ChildrenLength {
        entry: Entry,
        expected: usize,
        found: usize,
    },

    #[error("node {entry}: precomputed children are not sorted by end")]
    ChildrenNotSorted { entry: Entry },

    #[error("node {entry}: precomputed children are not the entries of its subtree")]
    ChildrenMismatch { entry: Entry },

    #[error("node {entry}: start is out of order for its position in the tree")]
    OrderViolation { entry: Entry },

    #[error("invalid entry ({entry}): {reason}")]
    InvalidEntry { entry: Entry, reason: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;
