//! On-disk form of a [`BedTree`].
//!
//! The tree is written as one recursive record per node:
//!
//! ```text
//! Node  := { entry: Entry, left: Node | null, right: Node | null, size: int, children: [Entry] }
//! Entry := { chromosome: string, start: int, end: int, attributes: [string] }
//! ```
//!
//! `children` is the node's precomputed sorted-by-end array, so loading never re-runs
//! insertion or finalization. Loading does check the shape and refuses anything inconsistent.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use bincode::Options;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use bedtree_core::models::Entry;

use crate::errors::{DeserializationError, IndexError, Result};
use crate::node::Node;
use crate::tree::{BedTree, validate_entry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    Json,
    Bincode,
}

impl FromStr for IndexFormat {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(IndexFormat::Json),
            "bin" | "bincode" => Ok(IndexFormat::Bincode),
            _ => Err(IndexError::UnknownFormat(s.to_string())),
        }
    }
}

impl IndexFormat {
    ///
    /// Guess the format from a file name: `.json` or `.bin`/`.bincode`, optionally
    /// followed by `.gz`.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| IndexError::UnknownFormat(path.display().to_string()))?;
        let name = name.strip_suffix(".gz").unwrap_or(name);

        match name.rsplit_once('.') {
            Some((_, ext)) => IndexFormat::from_str(ext)
                .map_err(|_| IndexError::UnknownFormat(path.display().to_string())),
            None => Err(IndexError::UnknownFormat(path.display().to_string())),
        }
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn write_tree<W: Write>(tree: &BedTree, mut writer: W, format: IndexFormat) -> Result<()> {
    match format {
        IndexFormat::Json => serde_json::to_writer(&mut writer, tree)?,
        IndexFormat::Bincode => bincode::serialize_into(&mut writer, tree)?,
    }
    writer.flush()?;
    Ok(())
}

///
/// Decode a tree and check its shape.
///
/// Equal starts chain to the right, so a valid file can nest far deeper than serde_json's
/// default recursion limit. Both decoders run without a depth limit on a growable stack.
///
pub fn read_tree<R: Read>(reader: R, format: IndexFormat) -> Result<BedTree> {
    let root = match format {
        IndexFormat::Json => {
            let mut json = serde_json::Deserializer::from_reader(reader);
            json.disable_recursion_limit();
            let root = Node::deserialize(serde_stacker::Deserializer::new(&mut json))
                .map_err(malformed_json)?;
            json.end().map_err(malformed_json)?;
            root
        }
        IndexFormat::Bincode => {
            // same encoding as `bincode::serialize_into`
            let options = bincode::DefaultOptions::new()
                .with_fixint_encoding()
                .allow_trailing_bytes();
            let mut bin = bincode::Deserializer::with_reader(reader, options);
            Node::deserialize(serde_stacker::Deserializer::new(&mut bin))
                .map_err(malformed_bincode)?
        }
    };
    Ok(BedTree::try_from(root)?)
}

fn malformed_json(err: serde_json::Error) -> IndexError {
    match err.classify() {
        serde_json::error::Category::Io => IndexError::Io(err.into()),
        _ => DeserializationError::Malformed(err.to_string()).into(),
    }
}

fn malformed_bincode(err: bincode::Error) -> IndexError {
    match *err {
        bincode::ErrorKind::Io(source) if source.kind() != io::ErrorKind::UnexpectedEof => {
            IndexError::Io(source)
        }
        other => DeserializationError::Malformed(other.to_string()).into(),
    }
}

///
/// Write a tree to disk. A `.gz` suffix gzips the output.
///
/// # Arguments
/// - tree: the finalized tree
/// - path: destination, parent directories are created
/// - format: explicit format, or `None` to infer it from `path`
///
pub fn save_tree(tree: &BedTree, path: &Path, format: Option<IndexFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => IndexFormat::from_path(path)?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;

    if is_gzipped(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_tree(tree, &mut encoder, format)?;
        encoder.finish()?.flush()?;
    } else {
        write_tree(tree, BufWriter::new(file), format)?;
    }

    log::info!("Saved index of {} entries to {}", tree.len(), path.display());
    Ok(())
}

pub fn load_tree(path: &Path, format: Option<IndexFormat>) -> Result<BedTree> {
    let format = match format {
        Some(format) => format,
        None => IndexFormat::from_path(path)?,
    };

    let file = File::open(path)?;
    let reader: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let tree = read_tree(BufReader::new(reader), format)?;
    log::info!("Loaded index of {} entries from {}", tree.len(), path.display());
    Ok(tree)
}

impl TryFrom<Node> for BedTree {
    type Error = DeserializationError;

    ///
    /// Adopt a deserialized node graph as a finalized tree after checking its shape: entries
    /// are valid, starts respect the search order, sizes add up, and every `children` array
    /// holds exactly the entries of its subtree, sorted by end.
    ///
    fn try_from(root: Node) -> std::result::Result<Self, Self::Error> {
        check_tree(&root)?;
        Ok(BedTree {
            root: Box::new(root),
        })
    }
}

fn check_entry(entry: &Entry) -> std::result::Result<(), DeserializationError> {
    validate_entry(entry).map_err(|reason| DeserializationError::InvalidEntry {
        entry: entry.clone(),
        reason,
    })
}

fn check_tree(root: &Node) -> std::result::Result<(), DeserializationError> {
    // top-down: entry validity and start bounds (`low` inclusive, `high` exclusive)
    let mut visited: Vec<&Node> = Vec::new();
    let mut pending: Vec<(&Node, Option<u32>, Option<u32>)> = vec![(root, None, None)];

    while let Some((node, low, high)) = pending.pop() {
        check_entry(&node.entry)?;

        let start = node.entry.start;
        if !(low.is_none_or(|l| start >= l) && high.is_none_or(|h| start < h)) {
            return Err(DeserializationError::OrderViolation {
                entry: node.entry.clone(),
            });
        }

        if let Some(left) = node.left() {
            pending.push((left, low, Some(start)));
        }
        if let Some(right) = node.right() {
            pending.push((right, Some(start), high));
        }
        visited.push(node);
    }

    // bottom-up: a node is checked only once both of its children passed
    visited.into_iter().rev().try_for_each(check_node)
}

fn check_node(node: &Node) -> std::result::Result<(), DeserializationError> {
    let actual = 1 + node.left().map_or(0, Node::size) + node.right().map_or(0, Node::size);
    if node.subtree_size != actual {
        return Err(DeserializationError::SizeMismatch {
            entry: node.entry.clone(),
            recorded: node.subtree_size,
            actual,
        });
    }

    if node.sorted_by_end.len() != actual {
        return Err(DeserializationError::ChildrenLength {
            entry: node.entry.clone(),
            expected: actual,
            found: node.sorted_by_end.len(),
        });
    }
    if !node.sorted_by_end.windows(2).all(|w| w[0].end <= w[1].end) {
        return Err(DeserializationError::ChildrenNotSorted {
            entry: node.entry.clone(),
        });
    }

    let mut counts: HashMap<&Entry, isize> = HashMap::default();
    let below = [node.left(), node.right()]
        .into_iter()
        .flatten()
        .flat_map(|child| child.sorted_by_end.iter());
    for entry in std::iter::once(&node.entry).chain(below) {
        *counts.entry(entry).or_default() += 1;
    }
    for entry in &node.sorted_by_end {
        *counts.entry(entry).or_default() -= 1;
    }
    if counts.values().any(|&count| count != 0) {
        return Err(DeserializationError::ChildrenMismatch {
            entry: node.entry.clone(),
        });
    }

    Ok(())
}
