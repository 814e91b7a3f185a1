use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use psites_consensus::config::{EngineKind, PipelineConfig};
use psites_consensus::engine::engine_from_config;
use psites_consensus::models::GeneAssignedPeak;
use psites_consensus::pipeline::ConsensusPipeline;

///
/// Settings of the run: the `--config` file (or the defaults), then every
/// flag given on the command line on top.
///
pub fn config_from_matches(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PipelineConfig::try_from(path.as_path())
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(classes) = matches.get_many::<i64>("classes") {
        config.classes = classes.copied().collect();
    }
    if let Some(cutoff) = matches.get_one::<u32>("cutoff") {
        config.cutoff = *cutoff;
    }
    if let Some(gap) = matches.get_one::<u32>("merge-gap") {
        config.merge_gap = *gap;
    }
    if let Some(engine) = matches.get_one::<String>("engine") {
        config.engine = match engine.as_str() {
            "bedtools" => EngineKind::Bedtools,
            _ => EngineKind::Native,
        };
    }
    if let Some(bedtools) = matches.get_one::<PathBuf>("bedtools") {
        config.bedtools = bedtools.clone();
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout_secs = Some(*timeout);
    }

    Ok(config)
}

fn write_peaks<W: Write>(out: &mut W, peaks: &[GeneAssignedPeak]) -> io::Result<()> {
    for peak in peaks {
        writeln!(out, "{}", peak)?;
    }
    out.flush()
}

pub fn run_consensus(matches: &ArgMatches) -> Result<()> {
    let reference = matches
        .get_one::<PathBuf>("reference")
        .context("REF is required")?;
    let files: Vec<&PathBuf> = matches
        .get_many::<PathBuf>("files")
        .context("at least one peak file is required")?
        .collect();

    let config = config_from_matches(matches)?;
    config.validate().context("Invalid pipeline settings")?;

    let engine = engine_from_config(&config);
    let pipeline = ConsensusPipeline::new(config, engine);

    let peaks = pipeline
        .run_files(reference, &files)
        .context("Failed to build consensus sites")?;

    match matches.get_one::<String>("output") {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            write_peaks(&mut BufWriter::new(file), &peaks)?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            write_peaks(&mut stdout.lock(), &peaks)?;
        }
    }

    Ok(())
}
