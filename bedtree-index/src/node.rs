use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

use bedtree_core::models::Entry;

/// An owned, optional child.
pub type Link = Option<Box<Node>>;

/// Free stack kept below a recursive step before a new segment is allocated.
const RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

///
/// Run one level of a recursive walk, moving to a fresh stack segment when the current one is
/// nearly used up. Entries sharing a start form a right-leaning chain, so recursion depth
/// follows the longest run of equal starts rather than log n.
///
#[inline]
pub(crate) fn with_stack<T>(f: impl FnOnce() -> T) -> T {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

///
/// A node of the search tree. Nodes are ordered by `entry.start`: everything in `left` starts
/// strictly before this node, everything in `right` starts at or after it.
///
/// Field names double as the persisted schema (`entry`, `left`, `right`, `size`, `children`).
///
#[derive(Debug, Deserialize)]
pub struct Node {
    pub(crate) entry: Entry,
    pub(crate) left: Link,
    pub(crate) right: Link,
    #[serde(rename = "size")]
    pub(crate) subtree_size: usize,
    /// Every entry of this subtree (this node included), ascending by `end`.
    /// Empty until the tree is finalized.
    #[serde(rename = "children")]
    pub(crate) sorted_by_end: Vec<Entry>,
}

#[derive(Serialize)]
struct NodeRecord<'a> {
    entry: &'a Entry,
    left: Option<&'a Node>,
    right: Option<&'a Node>,
    size: usize,
    children: &'a [Entry],
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = NodeRecord {
            entry: &self.entry,
            left: self.left(),
            right: self.right(),
            size: self.subtree_size,
            children: &self.sorted_by_end,
        };
        with_stack(|| record.serialize(serializer))
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        with_stack(|| Node {
            entry: self.entry.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
            subtree_size: self.subtree_size,
            sorted_by_end: self.sorted_by_end.clone(),
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        with_stack(|| {
            self.entry == other.entry
                && self.subtree_size == other.subtree_size
                && self.sorted_by_end == other.sorted_by_end
                && self.left == other.left
                && self.right == other.right
        })
    }
}

impl Eq for Node {}

impl Drop for Node {
    // unlink children onto a heap stack instead of dropping them recursively
    fn drop(&mut self) {
        let mut pending: Vec<Box<Node>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Node {
    pub fn leaf(entry: Entry) -> Self {
        Node {
            entry,
            left: None,
            right: None,
            subtree_size: 1,
            sorted_by_end: Vec::new(),
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub fn size(&self) -> usize {
        self.subtree_size
    }

    pub fn sorted_by_end(&self) -> &[Entry] {
        &self.sorted_by_end
    }

    fn fix_size(&mut self) {
        self.subtree_size = 1 + size_of(&self.left) + size_of(&self.right);
    }
}

#[inline]
pub(crate) fn size_of(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.subtree_size)
}

/// Rotate right: the left child becomes the subtree root.
fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut left) = node.left.take() else {
        return node;
    };
    node.left = left.right.take();
    node.fix_size();
    left.right = Some(node);
    left.fix_size();
    left
}

/// Rotate left: the right child becomes the subtree root.
fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut right) = node.right.take() else {
        return node;
    };
    node.right = right.left.take();
    node.fix_size();
    right.left = Some(node);
    right.fix_size();
    right
}

///
/// Randomized insertion. With probability `1 / (size + 1)` the new entry becomes the root of
/// the subtree, otherwise it is pushed down one level. Expected height stays O(log n)
/// whatever the insertion order.
///
pub(crate) fn insert<R: Rng>(link: Link, entry: Entry, rng: &mut R) -> Box<Node> {
    let Some(mut node) = link else {
        return Box::new(Node::leaf(entry));
    };

    if rng.random_range(0..=node.subtree_size) == 0 {
        return insert_at_root(Some(node), entry);
    }

    if entry.start < node.entry.start {
        node.left = Some(with_stack(|| insert(node.left.take(), entry, rng)));
    } else {
        node.right = Some(with_stack(|| insert(node.right.take(), entry, rng)));
    }
    node.fix_size();
    node
}

/// Insert `entry` at the bottom, then rotate it up until it is the root of this subtree.
///
/// Nodes whose start equals `entry.start` must end up right of the new root, so the descent
/// goes left on ties: the rotation back up then leaves them on the right.
pub(crate) fn insert_at_root(link: Link, entry: Entry) -> Box<Node> {
    let Some(mut node) = link else {
        return Box::new(Node::leaf(entry));
    };

    if entry.start <= node.entry.start {
        node.left = Some(with_stack(|| insert_at_root(node.left.take(), entry)));
        rotate_right(node)
    } else {
        node.right = Some(with_stack(|| insert_at_root(node.right.take(), entry)));
        rotate_left(node)
    }
}

///
/// Bottom-up pass filling `sorted_by_end` for every node of the subtree.
///
pub(crate) fn finalize(node: &mut Node) {
    if let Some(left) = node.left.as_deref_mut() {
        with_stack(|| finalize(left));
    }
    if let Some(right) = node.right.as_deref_mut() {
        with_stack(|| finalize(right));
    }

    let left = node.left.as_deref().map_or(&[][..], |n| n.sorted_by_end.as_slice());
    let right = node.right.as_deref().map_or(&[][..], |n| n.sorted_by_end.as_slice());

    let mut merged = merge_by_end(left, right);
    let at = merged.partition_point(|e| e.end <= node.entry.end);
    merged.insert(at, node.entry.clone());

    node.sorted_by_end = merged;
}

/// Drop every precomputed array of the subtree.
pub(crate) fn clear_sorted(node: &mut Node) {
    node.sorted_by_end = Vec::new();
    if let Some(left) = node.left.as_deref_mut() {
        with_stack(|| clear_sorted(left));
    }
    if let Some(right) = node.right.as_deref_mut() {
        with_stack(|| clear_sorted(right));
    }
}

/// Stable ascending merge by `end`; on ties `left` comes first.
pub(crate) fn merge_by_end(left: &[Entry], right: &[Entry]) -> Vec<Entry> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        if left[i].end <= right[j].end {
            merged.push(left[i].clone());
            i += 1;
        } else {
            merged.push(right[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);

    merged
}

/// Iterative, so a long chain of equal starts is measured without deep recursion.
pub(crate) fn height(link: Option<&Node>) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&Node, usize)> = link.map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend(node.left().map(|n| (n, depth + 1)));
        pending.extend(node.right().map(|n| (n, depth + 1)));
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn starts_in_order(node: Option<&Node>, out: &mut Vec<u32>) {
        if let Some(node) = node {
            starts_in_order(node.left(), out);
            out.push(node.entry.start);
            starts_in_order(node.right(), out);
        }
    }

    /// Strict on the left, inclusive on the right.
    fn check_order(node: Option<&Node>, low: Option<u32>, high: Option<u32>) {
        if let Some(node) = node {
            let start = node.entry.start;
            assert!(low.map_or(true, |l| start >= l), "{start} below {low:?}");
            assert!(high.map_or(true, |h| start < h), "{start} not below {high:?}");
            check_order(node.left(), low, Some(start));
            check_order(node.right(), Some(start), high);
        }
    }

    fn check_sizes(node: Option<&Node>) -> usize {
        match node {
            None => 0,
            Some(node) => {
                let size = 1 + check_sizes(node.left()) + check_sizes(node.right());
                assert_eq!(node.size(), size);
                size
            }
        }
    }

    fn chain(starts: &[u32]) -> Box<Node> {
        let mut root: Link = None;
        for &s in starts {
            root = Some(insert_at_root(root, Entry::new("chr1", s, s + 1)));
        }
        root.unwrap()
    }

    #[rstest]
    fn test_insert_at_root_makes_new_root() {
        let root = chain(&[10, 20, 5, 15]);
        assert_eq!(root.entry.start, 15);
        assert_eq!(root.size(), 4);
        check_sizes(Some(&root));

        let mut starts = Vec::new();
        starts_in_order(Some(&root), &mut starts);
        assert_eq!(starts, vec![5, 10, 15, 20]);
    }

    #[rstest]
    fn test_rotations_preserve_order_and_sizes() {
        let root = chain(&[1, 2, 3, 4, 5]);
        let rotated = rotate_right(root);
        check_sizes(Some(&rotated));
        let rotated = rotate_left(rotated);
        check_sizes(Some(&rotated));

        let mut starts = Vec::new();
        starts_in_order(Some(&rotated), &mut starts);
        assert_eq!(starts, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn test_rotation_without_child_is_noop() {
        let leaf = Box::new(Node::leaf(Entry::new("chr1", 1, 2)));
        let same = rotate_right(leaf.clone());
        assert_eq!(same, leaf);
        let same = rotate_left(leaf.clone());
        assert_eq!(same, leaf);
    }

    #[rstest]
    fn test_random_insert_keeps_bst_order() {
        let mut rng = StdRng::seed_from_u64(7);
        // lots of duplicate starts to exercise the tie rule through rotations
        let mut root: Link = None;
        let starts = [50u32, 3, 3, 99, 12, 50, 0, 77, 12, 12, 64, 8];
        for &s in &starts {
            root = Some(insert(root, Entry::new("chr1", s, s + 10), &mut rng));
        }
        let root = root.unwrap();
        assert_eq!(check_sizes(Some(&root)), starts.len());
        check_order(Some(&root), None, None);

        let mut found = Vec::new();
        starts_in_order(Some(&root), &mut found);
        let mut expected = starts.to_vec();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[rstest]
    fn test_ties_go_right() {
        let mut root = Box::new(Node::leaf(Entry::new("chr1", 5, 6)));
        root.right = Some(insert_at_root(root.right.take(), Entry::new("chr1", 5, 9)));
        root.fix_size();
        let rotated = insert_at_root(Some(root), Entry::new("chr1", 5, 7));
        assert_eq!(rotated.entry().end, 7);
        assert!(rotated.left().is_none());
        assert_eq!(rotated.size(), 3);
        check_order(Some(&rotated), None, None);
    }

    #[rstest]
    fn test_equal_starts_form_a_right_chain() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut root: Link = None;
        for i in 0..300u32 {
            root = Some(insert(root, Entry::new("chr1", 10, 10 + i), &mut rng));
        }
        let mut root = root.unwrap();
        assert_eq!(height(Some(&root)), 300);
        check_order(Some(&root), None, None);

        finalize(&mut root);
        assert_eq!(root.sorted_by_end().len(), 300);
        let copy = root.clone();
        assert_eq!(copy, root);
    }

    #[rstest]
    fn test_finalize_sorts_by_end_including_self() {
        let mut root = chain(&[10, 20, 5, 15]);
        finalize(&mut root);

        let ends: Vec<u32> = root.sorted_by_end().iter().map(|e| e.end).collect();
        assert_eq!(ends, vec![6, 11, 16, 21]);

        let left = root.left().unwrap();
        assert_eq!(left.sorted_by_end().len(), left.size());
        assert!(left.sorted_by_end().contains(left.entry()));
    }

    #[rstest]
    fn test_merge_by_end_is_stable() {
        let left = vec![Entry::new("a", 0, 1), Entry::new("a", 0, 3)];
        let right = vec![Entry::new("b", 0, 1), Entry::new("b", 0, 2)];
        let merged = merge_by_end(&left, &right);
        let chroms: Vec<&str> = merged.iter().map(|e| e.chromosome.as_str()).collect();
        assert_eq!(chroms, vec!["a", "b", "b", "a"]);
    }

    #[rstest]
    fn test_clear_sorted() {
        let mut root = chain(&[3, 1, 2]);
        finalize(&mut root);
        clear_sorted(&mut root);
        assert!(root.sorted_by_end().is_empty());
        assert!(root.left().map_or(true, |n| n.sorted_by_end().is_empty()));
        assert!(root.right().map_or(true, |n| n.sorted_by_end().is_empty()));
    }
}
