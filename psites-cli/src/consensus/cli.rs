use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const CONSENSUS_CMD: &str = "consensus";

pub fn create_consensus_cli() -> Command {
    Command::new(CONSENSUS_CMD)
        .about("Find peaks shared by samples, classify them by majority vote and number them along each gene. Outputs BED6.")
        .arg(
            Arg::new("reference")
                .value_name("REF")
                .required(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("BED6 of gene features with the gene symbol as name"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Classified peak files (BED6, name ending in :<class>); the sample id leads the file name"),
        )
        .arg(
            Arg::new("classes")
                .short('c')
                .value_name("CLASS")
                .action(ArgAction::Append)
                .value_parser(value_parser!(i64).range(1..=4))
                .help("Peak class used to build the consensus, repeatable [default: 1]"),
        )
        .arg(
            Arg::new("cutoff")
                .short('n')
                .value_name("CUTOFF")
                .value_parser(value_parser!(u32).range(1..))
                .help("Number of samples that must contain a peak [default: 2]"),
        )
        .arg(
            Arg::new("merge-gap")
                .long("merge-gap")
                .value_name("BP")
                .value_parser(value_parser!(u32))
                .help("Merge consensus spans at most this many bases apart [default: 2]"),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_parser(["native", "bedtools"])
                .help("Interval engine [default: native]"),
        )
        .arg(
            Arg::new("bedtools")
                .long("bedtools")
                .value_name("PATH")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("bedtools executable used by the bedtools engine"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .value_parser(value_parser!(u64))
                .help("Time limit for every bedtools call"),
        )
        .arg(
            arg!(--config <TOML> "Pipeline settings file; flags override its values")
                .required(false)
                .value_parser(value_parser!(std::path::PathBuf)),
        )
        .arg(arg!(--output <OUTPUT> "Output BED file (default: stdout)").required(false))
}
