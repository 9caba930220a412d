use std::io::{Read, Write};
use std::path::Path;

use rand::Rng;

use bedtree_core::models::Entry;

use crate::config::IndexConfig;
use crate::errors::{IndexError, Result};
use crate::persist::{self, IndexFormat};
use crate::traits::IntervalSearch;
use crate::tree::{BedTree, TreeBuilder};

///
/// A searchable, persistable index over BED entries.
///
/// # Examples
///
/// ```
/// use bedtree_core::models::Entry;
/// use bedtree_index::{BedIndex, IndexConfig};
///
/// let entries = vec![
///     Entry::new("chr1", 0, 5),
///     Entry::new("chr2", 2, 3),
///     Entry::new("chr1", 5, 10),
/// ];
/// let index = BedIndex::build_with_config(entries, &IndexConfig::new(Some(1), None)).unwrap();
///
/// assert_eq!(index.search(&Entry::query("chr1", 1, 15)), vec![Entry::new("chr1", 5, 10)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedIndex {
    tree: BedTree,
}

impl BedIndex {
    ///
    /// Build an index with insertion randomness drawn from OS entropy.
    ///
    /// Fails with [`IndexError::EmptyInput`] when `entries` is empty.
    ///
    pub fn build<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        Self::build_with_config(entries, &IndexConfig::default())
    }

    pub fn build_with_config<I>(entries: I, config: &IndexConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        Self::build_with_rng(entries, config.rng())
    }

    ///
    /// Build an index inserting `entries` in order, using `rng` to balance the tree.
    ///
    pub fn build_with_rng<I, R>(entries: I, rng: R) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
        R: Rng,
    {
        let mut entries = entries.into_iter();
        let first = entries.next().ok_or(IndexError::EmptyInput)?;

        let mut builder = TreeBuilder::new(first, rng)?;
        for entry in entries {
            builder.insert(entry)?;
        }
        let tree = builder.finalize();

        log::info!(
            "Built index of {} entries (tree height {})",
            tree.len(),
            tree.height()
        );

        Ok(BedIndex { tree })
    }

    pub fn search(&self, query: &Entry) -> Vec<Entry> {
        self.tree.find(query)
    }

    pub fn tree(&self) -> &BedTree {
        &self.tree
    }

    pub fn into_tree(self) -> BedTree {
        self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Save to `path`, format taken from the file name.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save_tree(&self.tree, path.as_ref(), None)
    }

    pub fn save_as<P: AsRef<Path>>(&self, path: P, format: IndexFormat) -> Result<()> {
        persist::save_tree(&self.tree, path.as_ref(), Some(format))
    }

    pub fn save_to_writer<W: Write>(&self, writer: W, format: IndexFormat) -> Result<()> {
        persist::write_tree(&self.tree, writer, format)
    }

    /// Load from `path`, format taken from the file name.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(BedIndex {
            tree: persist::load_tree(path.as_ref(), None)?,
        })
    }

    pub fn load_as<P: AsRef<Path>>(path: P, format: IndexFormat) -> Result<Self> {
        Ok(BedIndex {
            tree: persist::load_tree(path.as_ref(), Some(format))?,
        })
    }

    pub fn load_from_reader<R: Read>(reader: R, format: IndexFormat) -> Result<Self> {
        Ok(BedIndex {
            tree: persist::read_tree(reader, format)?,
        })
    }
}

impl From<BedTree> for BedIndex {
    fn from(tree: BedTree) -> Self {
        BedIndex { tree }
    }
}

impl IntervalSearch for BedIndex {
    fn search(&self, query: &Entry) -> Vec<Entry> {
        self.tree.find(query)
    }

    fn search_iter<'a>(&'a self, query: &'a Entry) -> Box<dyn Iterator<Item = &'a Entry> + 'a> {
        Box::new(self.tree.find_iter(query))
    }
}

impl IntervalSearch for BedTree {
    fn search(&self, query: &Entry) -> Vec<Entry> {
        self.find(query)
    }

    fn search_iter<'a>(&'a self, query: &'a Entry) -> Box<dyn Iterator<Item = &'a Entry> + 'a> {
        Box::new(self.find_iter(query))
    }
}
