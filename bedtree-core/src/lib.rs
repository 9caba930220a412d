//! Core models and input handling for bedtree.
//!
//! This crate holds the [`Entry`](models::Entry) record shared by every other bedtree crate and
//! a small BED reader that turns interval files into ordered sequences of entries. The search
//! structures themselves live in `bedtree-index`.
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use self::errors::BedError;
pub use self::models::Entry;
pub use self::utils::{read_bed, read_bed_from};
