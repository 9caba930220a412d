use bedtree_core::models::Entry;

/// Containment search over stored entries.
pub trait IntervalSearch {
    /// All stored entries on `query.chromosome` with both bounds inside the query window.
    fn search(&self, query: &Entry) -> Vec<Entry>;

    fn search_iter<'a>(&'a self, query: &'a Entry) -> Box<dyn Iterator<Item = &'a Entry> + 'a>;
}
