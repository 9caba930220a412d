use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use bedtree_core::models::Entry;
use bedtree_index::IndexFormat;
use bedtree_index::search::load_index;

/// Pull `--chrom`, `--start` and `--end` out of the matches.
pub fn region_from_matches(matches: &ArgMatches) -> Result<(String, u32, u32)> {
    let chrom = matches
        .get_one::<String>("chrom")
        .expect("A chromosome is required.");

    let parse = |name: &str| -> Result<u32> {
        let value = matches
            .get_one::<String>(name)
            .with_context(|| format!("--{} is required", name))?;
        value
            .parse::<u32>()
            .with_context(|| format!("Invalid --{}: {}", name, value))
    };

    Ok((chrom.to_string(), parse("start")?, parse("end")?))
}

/// `--format`, if given.
pub fn format_from_matches(matches: &ArgMatches) -> Result<Option<IndexFormat>> {
    matches
        .get_one::<String>("format")
        .map(|format| format.parse::<IndexFormat>())
        .transpose()
        .map_err(Into::into)
}

/// Write entries as BED lines to stdout.
pub fn write_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    for entry in entries {
        writeln!(writer, "{}", entry)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn run_search(matches: &ArgMatches) -> Result<()> {
    let index_path = matches
        .get_one::<String>("index")
        .expect("A path to an index is required.");

    let (chrom, start, end) = region_from_matches(matches)?;
    let format = format_from_matches(matches)?;

    let index = load_index(index_path, format)
        .with_context(|| format!("Failed to load index: {}", index_path))?;

    let mut hits = index.search(&Entry::query(chrom, start, end));
    hits.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));

    write_entries(&hits)
}
