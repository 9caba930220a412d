use rand::Rng;
use serde::{Serialize, Serializer};

use bedtree_core::models::Entry;

use crate::errors::{IndexError, Result};
use crate::node::{self, Node};
use crate::query;

///
/// Reject entries the tree cannot answer for: reversed intervals and the empty placeholder.
///
pub fn validate_entry(entry: &Entry) -> std::result::Result<(), String> {
    if entry.chromosome.is_empty() {
        return Err("chromosome is empty".to_string());
    }
    if entry.start > entry.end {
        return Err(format!("start {} is after end {}", entry.start, entry.end));
    }
    Ok(())
}

fn checked(entry: Entry) -> Result<Entry> {
    match validate_entry(&entry) {
        Ok(()) => Ok(entry),
        Err(reason) => Err(IndexError::InvalidEntry { entry, reason }),
    }
}

///
/// A tree that is still growing. Insertions are randomized with the supplied `rng`, so a
/// seeded generator gives a reproducible shape.
///
/// Call [`TreeBuilder::finalize`] to get a queryable [`BedTree`].
///
#[derive(Debug)]
pub struct TreeBuilder<R: Rng> {
    root: Box<Node>,
    rng: R,
}

impl<R: Rng> TreeBuilder<R> {
    pub fn new(first: Entry, rng: R) -> Result<Self> {
        Ok(TreeBuilder {
            root: Box::new(Node::leaf(checked(first)?)),
            rng,
        })
    }

    pub fn insert(&mut self, entry: Entry) -> Result<()> {
        let entry = checked(entry)?;
        // swap the root out so ownership can move through the recursive insert
        let root = std::mem::replace(&mut self.root, Box::new(Node::leaf(Entry::default())));
        self.root = node::insert(Some(root), entry, &mut self.rng);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.root.size()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    ///
    /// Materialize the per-node sorted-by-end arrays and switch to query mode.
    ///
    pub fn finalize(mut self) -> BedTree {
        node::finalize(&mut self.root);
        BedTree { root: self.root }
    }
}

///
/// A finalized, read-only randomized interval-search tree.
///
/// The tree is ordered by `start`; every node also carries every entry of its subtree sorted by
/// `end`, which lets [`BedTree::find`] answer containment queries in
/// O(log² n + k) instead of scanning all n entries.
///
/// # Examples
///
/// ```
/// use bedtree_core::models::Entry;
/// use bedtree_index::TreeBuilder;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut builder = TreeBuilder::new(Entry::new("chr1", 0, 5), StdRng::seed_from_u64(42)).unwrap();
/// builder.insert(Entry::new("chr1", 2, 3)).unwrap();
/// builder.insert(Entry::new("chr1", 5, 10)).unwrap();
/// let tree = builder.finalize();
///
/// let mut hits = tree.find(&Entry::query("chr1", 1, 15));
/// hits.sort_by_key(|e| e.start);
/// assert_eq!(hits, vec![Entry::new("chr1", 2, 3), Entry::new("chr1", 5, 10)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedTree {
    pub(crate) root: Box<Node>,
}

impl BedTree {
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.root.size()
    }

    /// Always false: a tree holds at least one entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Length of the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        node::height(Some(&self.root))
    }

    ///
    /// All stored entries `e` with `e.chromosome == q.chromosome`, `q.start <= e.start < q.end`
    /// and `q.start <= e.end <= q.end`. Order is unspecified.
    ///
    pub fn find(&self, query: &Entry) -> Vec<Entry> {
        self.find_iter(query).cloned().collect()
    }

    pub fn find_iter<'a>(&'a self, query: &'a Entry) -> impl Iterator<Item = &'a Entry> + 'a {
        query::find_iter(&self.root, query)
    }

    /// In-order iterator, ascending by start.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(Some(&self.root));
        iter
    }

    ///
    /// Go back to building. The precomputed arrays are dropped, so the returned builder has to
    /// be finalized again before querying.
    ///
    pub fn into_builder<R: Rng>(mut self, rng: R) -> TreeBuilder<R> {
        node::clear_sorted(&mut self.root);
        TreeBuilder {
            root: self.root,
            rng,
        }
    }
}

impl Serialize for BedTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

/// In-order traversal of a [`BedTree`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right());
        Some(node.entry())
    }
}

impl<'a> IntoIterator for &'a BedTree {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn entries() -> Vec<Entry> {
        (0..200u32)
            .map(|i| Entry::new("chr1", (i * 37) % 500, (i * 37) % 500 + i % 13))
            .collect()
    }

    fn build(entries: &[Entry], seed: u64) -> BedTree {
        let mut builder =
            TreeBuilder::new(entries[0].clone(), StdRng::seed_from_u64(seed)).unwrap();
        for e in &entries[1..] {
            builder.insert(e.clone()).unwrap();
        }
        builder.finalize()
    }

    #[rstest]
    fn test_len_matches_input(entries: Vec<Entry>) {
        let tree = build(&entries, 1);
        assert_eq!(tree.len(), entries.len());
        assert_eq!(tree.root().sorted_by_end().len(), entries.len());
    }

    #[rstest]
    fn test_same_seed_same_shape(entries: Vec<Entry>) {
        assert_eq!(build(&entries, 9), build(&entries, 9));
    }

    #[rstest]
    fn test_sorted_input_stays_shallow() {
        // sorted input degenerates a plain BST into a list
        let sorted: Vec<Entry> = (0..2000u32).map(|i| Entry::new("chr1", i, i + 1)).collect();
        let tree = build(&sorted, 3);
        assert!(tree.height() < 100, "height {}", tree.height());
    }

    #[rstest]
    fn test_iter_is_sorted_by_start(entries: Vec<Entry>) {
        let tree = build(&entries, 5);
        let starts: Vec<u32> = tree.iter().map(|e| e.start).collect();
        assert_eq!(starts.len(), entries.len());
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[rstest]
    fn test_rejects_reversed_interval() {
        let err = TreeBuilder::new(Entry::new("chr1", 10, 5), StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, IndexError::InvalidEntry { .. }));

        let mut builder =
            TreeBuilder::new(Entry::new("chr1", 1, 5), StdRng::seed_from_u64(0)).unwrap();
        let err = builder.insert(Entry::new("chr1", 7, 6)).unwrap_err();
        assert!(matches!(err, IndexError::InvalidEntry { .. }));
        assert_eq!(builder.len(), 1);
    }

    #[rstest]
    fn test_rejects_placeholder() {
        let err = TreeBuilder::new(Entry::default(), StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, IndexError::InvalidEntry { .. }));
    }

    #[rstest]
    fn test_zero_width_interval_is_accepted() {
        let tree = TreeBuilder::new(Entry::new("chr1", 4, 4), StdRng::seed_from_u64(0))
            .unwrap()
            .finalize();
        assert_eq!(tree.find(&Entry::query("chr1", 4, 5)), vec![Entry::new("chr1", 4, 4)]);
    }

    #[rstest]
    fn test_into_builder_requires_refinalize(entries: Vec<Entry>) {
        let tree = build(&entries, 11);
        let mut builder = tree.into_builder(StdRng::seed_from_u64(12));
        assert!(builder.root().sorted_by_end().is_empty());

        builder.insert(Entry::new("chr1", 1000, 1001)).unwrap();
        let tree = builder.finalize();
        assert_eq!(tree.len(), entries.len() + 1);
        assert_eq!(
            tree.find(&Entry::query("chr1", 999, 1002)),
            vec![Entry::new("chr1", 1000, 1001)]
        );
    }
}
