use std::path::Path;

use fxhash::FxHashSet as HashSet;

use bedtree_core::models::Entry;
use bedtree_core::read_bed;

use crate::errors::Result;
use crate::index::BedIndex;
use crate::persist::IndexFormat;
use crate::traits::IntervalSearch;

///
/// Load an index saved by [`crate::create::create_index`] or [`BedIndex::save`].
///
/// `format` must be given when the file name does not end in `.json` or `.bin`/`.bincode`
/// (optionally followed by `.gz`).
///
pub fn load_index<P: AsRef<Path>>(index_path: P, format: Option<IndexFormat>) -> Result<BedIndex> {
    match format {
        Some(format) => BedIndex::load_as(index_path, format),
        None => BedIndex::load(index_path),
    }
}

///
/// Entries of a freshly read BED file that the index also reports for the given region.
///
/// The result keeps the order of the BED file, and repeated lines are reported once.
///
/// # Arguments
/// - index: a loaded index
/// - bed_path: BED file to intersect with
/// - chromosome, start, end: the query window
///
pub fn find_with_index<P: AsRef<Path>>(
    index: &impl IntervalSearch,
    bed_path: P,
    chromosome: &str,
    start: u32,
    end: u32,
) -> Result<Vec<Entry>> {
    let bed_data = read_bed(bed_path.as_ref())?;
    let query = Entry::query(chromosome, start, end);

    let found: HashSet<&Entry> = index.search_iter(&query).collect();
    let mut seen: HashSet<&Entry> = HashSet::default();

    let hits: Vec<Entry> = bed_data
        .iter()
        .filter(|e| found.contains(e) && seen.insert(*e))
        .cloned()
        .collect();

    log::debug!(
        "{} of {} BED entries found in index for {}:{}-{}",
        hits.len(),
        bed_data.len(),
        chromosome,
        start,
        end
    );

    Ok(hits)
}
