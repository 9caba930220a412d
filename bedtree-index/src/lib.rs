//! A randomized balanced interval-search tree for genomic intervals.
//!
//! Entries are indexed by start in a treap-style binary search tree whose shape is decided by
//! an explicitly supplied random source. After a one-time finalize step every node carries its
//! subtree's entries sorted by end, so a query window decomposes into a few boundary nodes
//! plus whole subtrees that are sliced with two binary searches.
//!
//! A query asks for stored entries on the query chromosome with
//! `q.start <= start < q.end` and `q.start <= end <= q.end`. This is containment on both
//! bounds, not general overlap.
//!
//! ## Quick Start
//!
//! ```rust
//! use bedtree_core::models::Entry;
//! use bedtree_index::{BedIndex, IndexFormat};
//!
//! let index = BedIndex::build(vec![
//!     Entry::new("chr1", 0, 5),
//!     Entry::new("chr1", 2, 3),
//!     Entry::new("chr1", 5, 10),
//! ])
//! .unwrap();
//!
//! let mut hits = index.search(&Entry::query("chr1", 1, 15));
//! hits.sort_by_key(|e| e.start);
//! assert_eq!(hits, vec![Entry::new("chr1", 2, 3), Entry::new("chr1", 5, 10)]);
//!
//! // persist and reload without rebuilding
//! let mut buf = Vec::new();
//! index.save_to_writer(&mut buf, IndexFormat::Json).unwrap();
//! let loaded = BedIndex::load_from_reader(buf.as_slice(), IndexFormat::Json).unwrap();
//! assert_eq!(loaded.len(), 3);
//! ```

pub mod config;
pub mod create;
pub mod errors;
pub mod index;
pub mod node;
pub mod persist;
mod query;
pub mod search;
pub mod traits;
pub mod tree;

// re-exports
pub use self::config::IndexConfig;
pub use self::errors::{DeserializationError, IndexError};
pub use self::index::BedIndex;
pub use self::persist::IndexFormat;
pub use self::traits::IntervalSearch;
pub use self::tree::{BedTree, TreeBuilder};

/// Constants used throughout the crate.
pub mod consts {
    pub const INDEX_CMD: &str = "create";
    pub const SEARCH_CMD: &str = "search";
    pub const FIND_CMD: &str = "find";
}
