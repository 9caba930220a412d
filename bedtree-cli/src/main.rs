mod create;
mod find;
mod search;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "bedtree";
    pub const BIN_NAME: &str = "bedtree";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Index BED files into randomized interval-search trees and query them by region.")
        .subcommand_required(true)
        .subcommand(create::cli::create_index_cli())
        .subcommand(search::cli::create_search_cli())
        .subcommand(find::cli::create_find_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // CREATE
        //
        Some((create::cli::INDEX_CMD, matches)) => {
            create::handlers::run_create(matches)?;
        }

        //
        // SEARCH
        //
        Some((search::cli::SEARCH_CMD, matches)) => {
            search::handlers::run_search(matches)?;
        }

        //
        // FIND WITH INDEX
        //
        Some((find::cli::FIND_CMD, matches)) => {
            find::handlers::run_find(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    log::debug!("{} finished", consts::PKG_NAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_create_flags_override_config() {
        let tempdir = tempfile::tempdir().unwrap();
        let config_path = tempdir.path().join("index.toml");
        std::fs::write(&config_path, "seed = 1\nformat = \"json\"\n").unwrap();

        let matches = build_parser()
            .try_get_matches_from([
                "bedtree",
                "create",
                "--bed",
                "in.bed",
                "--output",
                "out.idx",
                "--seed",
                "5",
                "--config",
                config_path.to_str().unwrap(),
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let config = create::handlers::config_from_matches(sub).unwrap();

        assert_eq!(config.seed, Some(5));
        assert_eq!(config.format, Some(bedtree_index::IndexFormat::Json));
    }

    #[rstest]
    fn test_region_parsing() {
        let matches = build_parser()
            .try_get_matches_from([
                "bedtree", "search", "--index", "x.json", "--chrom", "chr2", "--start", "10",
                "--end", "20",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let region = search::handlers::region_from_matches(sub).unwrap();
        assert_eq!(region, ("chr2".to_string(), 10, 20));
    }

    #[rstest]
    #[case("search", &[][..], None)]
    #[case("search", &["--format", "bincode"][..], Some(bedtree_index::IndexFormat::Bincode))]
    #[case("find", &["--bed", "in.bed", "--format", "json"][..], Some(bedtree_index::IndexFormat::Json))]
    fn test_query_format_flag(
        #[case] command: &str,
        #[case] extra: &[&str],
        #[case] expected: Option<bedtree_index::IndexFormat>,
    ) {
        let mut args = vec![
            "bedtree", command, "--index", "x.idx", "--chrom", "chr1", "--start", "0", "--end",
            "10",
        ];
        args.extend_from_slice(extra);

        let matches = build_parser().try_get_matches_from(args).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(search::handlers::format_from_matches(sub).unwrap(), expected);
    }

    #[rstest]
    fn test_bad_region_is_an_error() {
        let matches = build_parser()
            .try_get_matches_from([
                "bedtree", "search", "--index", "x.json", "--chrom", "chr2", "--start", "ten",
                "--end", "20",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(search::handlers::region_from_matches(sub).is_err());
    }
}
