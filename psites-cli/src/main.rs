mod consensus;
mod interactions;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "psites";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Consensus poly(A) site catalogs from classified peak calls of many samples.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug); RUST_LOG takes precedence"),
        )
        .subcommand(consensus::cli::create_consensus_cli())
        .subcommand(interactions::cli::create_interactions_cli())
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    match matches.subcommand() {
        //
        // CONSENSUS SITES
        //
        Some((consensus::cli::CONSENSUS_CMD, matches)) => {
            consensus::handlers::run_consensus(matches)?;
        }

        //
        // PRIMARY SITE INTERACTIONS
        //
        Some((interactions::cli::INTERACTIONS_CMD, matches)) => {
            interactions::handlers::run_interactions(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }
}
