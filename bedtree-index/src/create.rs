use std::path::Path;

use bedtree_core::read_bed;

use crate::config::IndexConfig;
use crate::errors::Result;
use crate::index::BedIndex;

///
/// Read a BED file, build an index over its entries and save it.
///
/// # Arguments
/// - bed_path: the BED file to index (may be gzip'd)
/// - index_path: where to write the index
/// - config: seed and storage format
///
pub fn create_index<P, Q>(bed_path: P, index_path: Q, config: &IndexConfig) -> Result<BedIndex>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let entries = read_bed(bed_path.as_ref())?;
    log::info!(
        "Read {} entries from {}",
        entries.len(),
        bed_path.as_ref().display()
    );

    let index = BedIndex::build_with_config(entries, config)?;

    match config.format {
        Some(format) => index.save_as(index_path, format)?,
        None => index.save(index_path)?,
    }

    Ok(index)
}
