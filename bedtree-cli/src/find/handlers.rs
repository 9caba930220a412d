use anyhow::{Context, Result};
use clap::ArgMatches;

use bedtree_index::search::{find_with_index, load_index};

use crate::search::handlers::{format_from_matches, region_from_matches, write_entries};

pub fn run_find(matches: &ArgMatches) -> Result<()> {
    let index_path = matches
        .get_one::<String>("index")
        .expect("A path to an index is required.");

    let bed = matches
        .get_one::<String>("bed")
        .expect("A path to a BED file is required.");

    let (chrom, start, end) = region_from_matches(matches)?;
    let format = format_from_matches(matches)?;

    let index = load_index(index_path, format)
        .with_context(|| format!("Failed to load index: {}", index_path))?;

    let hits = find_with_index(&index, bed, &chrom, start, end)?;

    write_entries(&hits)
}
