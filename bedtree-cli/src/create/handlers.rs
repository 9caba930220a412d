use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use bedtree_index::create::create_index;
use bedtree_index::{IndexConfig, IndexFormat};

/// Resolve the config file (if any) and let command line flags override it.
pub fn config_from_matches(matches: &ArgMatches) -> Result<IndexConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => IndexConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read config file: {}", path))?,
        None => IndexConfig::default(),
    };

    if let Some(seed) = matches.get_one::<String>("seed") {
        config.seed = Some(
            seed.parse::<u64>()
                .with_context(|| format!("Invalid seed: {}", seed))?,
        );
    }

    if let Some(format) = matches.get_one::<String>("format") {
        config.format = Some(format.parse::<IndexFormat>()?);
    }

    Ok(config)
}

pub fn run_create(matches: &ArgMatches) -> Result<()> {
    let bed = matches
        .get_one::<String>("bed")
        .expect("A path to a BED file is required.");

    let output = matches
        .get_one::<String>("output")
        .expect("An output path is required.");

    let config = config_from_matches(matches)?;

    let index = create_index(bed, output, &config)
        .with_context(|| format!("Failed to index {}", bed))?;

    println!("Indexed {} entries into {}", index.len(), output);

    Ok(())
}
