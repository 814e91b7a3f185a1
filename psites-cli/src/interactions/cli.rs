use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const INTERACTIONS_CMD: &str = "interactions";

pub fn create_interactions_cli() -> Command {
    Command::new(INTERACTIONS_CMD)
        .about("Keep site interaction test results that involve a primary site of either compared sample.")
        .arg(
            Arg::new("results")
                .value_name("RESULTS")
                .required(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Test result table with SiteA and SiteB columns; the compared samples lead the file name"),
        )
        .arg(
            Arg::new("primary")
                .value_name("PRIMARY_TABLE")
                .required(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Primary site table indexed by site, one <sample>.<pos|neg> column per sample and strand"),
        )
        .arg(
            Arg::new("header")
                .long("header")
                .action(ArgAction::SetTrue)
                .help("Keep the header line of the results table"),
        )
        .arg(arg!(--output <OUTPUT> "Output file (default: stdout)").required(false))
}
