use clap::{Command, arg};

pub use bedtree_index::consts::SEARCH_CMD;

pub fn create_search_cli() -> Command {
    Command::new(SEARCH_CMD)
        .about("Report indexed entries lying inside a region")
        .arg(arg!(--index <INDEX> "Path to an index created with `create`").required(true))
        .arg(arg!(--chrom <CHROM> "Chromosome of the query region").required(true))
        .arg(arg!(--start <START> "Start of the query region").required(true))
        .arg(arg!(--end <END> "End of the query region").required(true))
        .arg(arg!(--format <FORMAT> "Index format: json or bincode (default: from file name)").required(false))
}
