use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use psites_consensus::interactions::{PrimarySiteTable, comparison_columns, filter_interactions};
use psites_core::utils::get_dynamic_reader;

fn filter_to<W: Write>(
    results: &Path,
    table: &PrimarySiteTable,
    keep_header: bool,
    out: &mut W,
) -> Result<usize> {
    let (a, b) = comparison_columns(results)?;
    info!("comparing primary sites of {} and {}", a, b);

    let reader = get_dynamic_reader(results)?;
    let kept = filter_interactions(
        reader,
        &results.display().to_string(),
        table,
        (a.as_str(), b.as_str()),
        keep_header,
        out,
    )?;
    out.flush()?;

    Ok(kept)
}

pub fn run_interactions(matches: &ArgMatches) -> Result<()> {
    let results = matches
        .get_one::<PathBuf>("results")
        .context("RESULTS is required")?;
    let primary = matches
        .get_one::<PathBuf>("primary")
        .context("PRIMARY_TABLE is required")?;
    let keep_header = matches.get_flag("header");

    let table = PrimarySiteTable::from_path(primary)
        .with_context(|| format!("Failed to load primary site table: {}", primary.display()))?;

    let kept = match matches.get_one::<String>("output") {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            filter_to(results, &table, keep_header, &mut BufWriter::new(file))?
        }
        None => {
            let stdout = io::stdout();
            filter_to(results, &table, keep_header, &mut stdout.lock())?
        }
    };
    info!("{} interactions involve a primary site", kept);

    Ok(())
}
