use clap::{Command, arg};

pub use bedtree_index::consts::FIND_CMD;

pub fn create_find_cli() -> Command {
    Command::new(FIND_CMD)
        .about("Report entries of a BED file that the index also finds inside a region")
        .arg(arg!(--index <INDEX> "Path to an index created with `create`").required(true))
        .arg(arg!(--bed <BED> "BED file to intersect with the index").required(true))
        .arg(arg!(--chrom <CHROM> "Chromosome of the query region").required(true))
        .arg(arg!(--start <START> "Start of the query region").required(true))
        .arg(arg!(--end <END> "End of the query region").required(true))
        .arg(arg!(--format <FORMAT> "Index format: json or bincode (default: from file name)").required(false))
}
