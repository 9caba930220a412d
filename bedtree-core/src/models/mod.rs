pub mod entry;

// re-export for cleaner imports
pub use self::entry::Entry;
