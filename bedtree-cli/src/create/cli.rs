use clap::{Command, arg};

pub use bedtree_index::consts::INDEX_CMD;

pub fn create_index_cli() -> Command {
    Command::new(INDEX_CMD)
        .about("Build a search index from a BED file and save it")
        .arg(arg!(--bed <BED> "Path to the BED file to index (may be gzipped)").required(true))
        .arg(
            arg!(--output <INDEX> "Where to write the index (.json or .bin, optionally .gz)")
                .required(true),
        )
        .arg(arg!(--seed <SEED> "Seed for the randomized tree balancing").required(false))
        .arg(arg!(--format <FORMAT> "Index format: json or bincode (default: from file name)").required(false))
        .arg(arg!(--config <CONFIG> "TOML file with seed and format").required(false))
}
