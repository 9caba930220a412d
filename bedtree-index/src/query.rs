//! Range query over a finalized tree.
//!
//! Entries are treated as points `(start, end)`; a query window `[q.start, q.end]` asks for the
//! points inside the square `q.start <= start < q.end`, `q.start <= end <= q.end`. The tree is
//! ordered by start, so the start bound is handled by the classic range-tree decomposition into
//! boundary nodes plus whole canonical subtrees, and the end bound is handled per canonical
//! subtree by binary search in its precomputed `sorted_by_end` array.

use bedtree_core::models::Entry;

use crate::node::Node;

/// Nodes collected while walking away from the split node.
#[derive(Debug, Default)]
pub(crate) struct Decomposition<'a> {
    /// Checked one by one against the end bound.
    pub boundary_nodes: Vec<&'a Node>,
    /// Subtrees whose every start is inside the window.
    pub canonical_roots: Vec<&'a Node>,
}

impl<'a> Decomposition<'a> {
    pub fn concat(mut self, other: Decomposition<'a>) -> Decomposition<'a> {
        self.boundary_nodes.extend(other.boundary_nodes);
        self.canonical_roots.extend(other.canonical_roots);
        self
    }
}

/// First node on the root path whose start falls inside `[q.start, q.end)`.
pub(crate) fn find_split<'a>(root: &'a Node, query: &Entry) -> Option<&'a Node> {
    let mut current = Some(root);
    while let Some(node) = current {
        let start = node.entry.start;
        if query.start <= start && start < query.end {
            return Some(node);
        }
        current = if start < query.start {
            node.right()
        } else {
            node.left()
        };
    }
    None
}

/// Walk the split node's left subtree towards `q.start`.
pub(crate) fn walk_lower<'a>(from: Option<&'a Node>, query: &Entry) -> Decomposition<'a> {
    let mut result = Decomposition::default();
    let mut current = from;

    while let Some(node) = current {
        if query.start <= node.entry.start {
            result.boundary_nodes.push(node);
            if let Some(right) = node.right() {
                result.canonical_roots.push(right);
            }
            current = node.left();
        } else {
            current = node.right();
        }
    }

    result
}

/// Walk the split node's right subtree towards `q.end`.
pub(crate) fn walk_upper<'a>(from: Option<&'a Node>, query: &Entry) -> Decomposition<'a> {
    let mut result = Decomposition::default();
    let mut current = from;

    while let Some(node) = current {
        if node.entry.start < query.end {
            result.boundary_nodes.push(node);
            if let Some(left) = node.left() {
                result.canonical_roots.push(left);
            }
            current = node.right();
        } else {
            current = node.left();
        }
    }

    result
}

/// The boundary nodes and canonical subtrees covering every entry whose start is in the window.
pub(crate) fn decompose<'a>(root: &'a Node, query: &Entry) -> Option<Decomposition<'a>> {
    let split = find_split(root, query)?;

    let own = Decomposition {
        boundary_nodes: vec![split],
        canonical_roots: Vec::new(),
    };

    Some(
        own.concat(walk_lower(split.left(), query))
            .concat(walk_upper(split.right(), query)),
    )
}

///
/// The contiguous run of `sorted` with `end` in `[q.start, q.end]`.
///
/// `sorted` must be ascending by end.
///
pub(crate) fn slice_by_end<'a>(sorted: &'a [Entry], query: &Entry) -> &'a [Entry] {
    let lo = sorted.partition_point(|e| e.end < query.start);
    let hi = sorted.partition_point(|e| e.end <= query.end);
    if lo < hi { &sorted[lo..hi] } else { &[] }
}

///
/// Every entry under `root` contained in `query`, in no particular order.
///
pub(crate) fn find_iter<'a>(root: &'a Node, query: &'a Entry) -> impl Iterator<Item = &'a Entry> + 'a {
    let decomposition = decompose(root, query).unwrap_or_default();

    log::debug!(
        "query {}: {} boundary nodes, {} canonical subtrees",
        query,
        decomposition.boundary_nodes.len(),
        decomposition.canonical_roots.len()
    );

    let boundary = decomposition
        .boundary_nodes
        .into_iter()
        .map(|node| &node.entry)
        .filter(move |e| query.start <= e.end && e.end <= query.end);

    let canonical = decomposition
        .canonical_roots
        .into_iter()
        .flat_map(move |node| slice_by_end(&node.sorted_by_end, query).iter());

    boundary
        .chain(canonical)
        .filter(move |e| e.chromosome == query.chromosome && !e.is_placeholder())
}
