//! Interval engine backed by an installed `bedtools`.
//!
//! Every input is written to a named temporary file and every command writes
//! its stdout to another one. All of them are removed when dropped, so no
//! artifact outlives a call whichever way it returns.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::debug;
use psites_core::models::{Region, RegionSet};
use tempfile::NamedTempFile;

use super::{CoverageSpan, IntervalEngine};
use crate::errors::{ConsensusError, ConsensusResult};

/// How often a running command is polled while a timeout is in force.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Number of leading columns in `multiinter` output before the per-sample flags.
const MULTIINTER_FIXED_COLUMNS: usize = 5;

#[derive(Debug, Clone)]
pub struct BedtoolsEngine {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl BedtoolsEngine {
    pub fn new(executable: PathBuf, timeout: Option<Duration>) -> Self {
        BedtoolsEngine {
            executable,
            timeout,
        }
    }

    /// Write a sorted copy of `rs` to a fresh temporary BED file.
    fn write_temp(rs: &RegionSet) -> ConsensusResult<NamedTempFile> {
        let mut sorted = rs.clone();
        sorted.sort();

        let mut file = tempfile::Builder::new()
            .prefix("psites_")
            .suffix(".bed")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            sorted.write_bed(&mut writer)?;
            writer.flush()?;
        }

        Ok(file)
    }

    fn render_command(&self, args: &[OsString]) -> String {
        let mut rendered = self.executable.display().to_string();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }

    /// Wait for `child`, killing it once the timeout (if any) expires.
    fn wait(&self, child: &mut Child, command: &str) -> ConsensusResult<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                // the child may have exited in between; either way reap it
                let _ = child.kill();
                let _ = child.wait();
                return Err(ConsensusError::EngineTimeout {
                    command: command.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL);
        }
    }

    ///
    /// Run one bedtools subcommand and return the lines it printed.
    ///
    /// stdout goes to a temporary file rather than a pipe so a large output
    /// cannot stall the child while we only poll it.
    ///
    fn run(&self, args: Vec<OsString>) -> ConsensusResult<Vec<String>> {
        let command = self.render_command(&args);
        debug!("running `{}`", command);

        let stdout_file = tempfile::Builder::new()
            .prefix("psites_")
            .suffix(".out")
            .tempfile()?;
        let mut stderr_file = tempfile::tempfile()?;

        let mut child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file.reopen()?))
            .stderr(Stdio::from(stderr_file.try_clone()?))
            .spawn()
            .map_err(|e| ConsensusError::EngineInvocation {
                command: command.clone(),
                diagnostic: e.to_string(),
            })?;

        let status = self.wait(&mut child, &command)?;

        if !status.success() {
            let mut diagnostic = String::new();
            stderr_file.seek(SeekFrom::Start(0))?;
            stderr_file.read_to_string(&mut diagnostic)?;

            let diagnostic = match diagnostic.trim() {
                "" => format!("exited with {}", status),
                text => text.to_string(),
            };
            return Err(ConsensusError::EngineInvocation {
                command,
                diagnostic,
            });
        }

        let reader = BufReader::new(File::open(stdout_file.path())?);
        let lines = reader
            .lines()
            .filter(|l| l.as_ref().map_or(true, |l| !l.is_empty()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lines)
    }

    fn parse_regions(lines: &[String]) -> ConsensusResult<RegionSet> {
        let regions = lines
            .iter()
            .map(|l| Region::from_bed_line(l))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RegionSet::from(regions))
    }
}

fn parse_u32(field: &str, line: &str) -> ConsensusResult<u32> {
    field
        .parse::<u32>()
        .map_err(|_| ConsensusError::EngineOutput(line.to_string()))
}

fn path_arg(file: &NamedTempFile) -> OsString {
    file.path().as_os_str().to_owned()
}

impl IntervalEngine for BedtoolsEngine {
    fn name(&self) -> &'static str {
        "bedtools"
    }

    fn multi_coverage(&self, samples: &[(String, RegionSet)]) -> ConsensusResult<Vec<CoverageSpan>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let files = samples
            .iter()
            .map(|(_, rs)| Self::write_temp(rs))
            .collect::<ConsensusResult<Vec<_>>>()?;

        let mut args: Vec<OsString> = vec!["multiinter".into(), "-header".into(), "-names".into()];
        args.extend(samples.iter().map(|(name, _)| OsString::from(name)));
        args.push("-i".into());
        args.extend(files.iter().map(path_arg));

        let lines = self.run(args)?;

        // first line is the column header
        lines
            .iter()
            .skip(1)
            .map(|line| {
                let fields: Vec<&str> = line.split('\t').collect();
                if fields.len() != MULTIINTER_FIXED_COLUMNS + samples.len() {
                    return Err(ConsensusError::EngineOutput(line.clone()));
                }
                Ok(CoverageSpan {
                    chr: fields[0].to_string(),
                    start: parse_u32(fields[1], line)?,
                    end: parse_u32(fields[2], line)?,
                    num: parse_u32(fields[3], line)?,
                    presence: fields[MULTIINTER_FIXED_COLUMNS..]
                        .iter()
                        .map(|f| *f == "1")
                        .collect(),
                })
            })
            .collect()
    }

    fn merge(&self, regions: &RegionSet, gap: u32) -> ConsensusResult<RegionSet> {
        if regions.is_empty() {
            return Ok(RegionSet::default());
        }

        // only the coordinates take part in a merge
        let coords = RegionSet::from(
            regions
                .iter()
                .map(|r| Region {
                    rest: None,
                    ..r.clone()
                })
                .collect::<Vec<_>>(),
        );
        let input = Self::write_temp(&coords)?;

        let lines = self.run(vec![
            "merge".into(),
            "-d".into(),
            gap.to_string().into(),
            "-i".into(),
            path_arg(&input),
        ])?;

        Self::parse_regions(&lines)
    }

    fn overlap_aggregate(
        &self,
        a: &RegionSet,
        b: &RegionSet,
        column: usize,
    ) -> ConsensusResult<RegionSet> {
        if a.is_empty() || b.is_empty() {
            return Ok(RegionSet::default());
        }

        let a_file = Self::write_temp(a)?;
        let b_file = Self::write_temp(b)?;

        let lines = self.run(vec![
            "map".into(),
            "-c".into(),
            column.to_string().into(),
            "-o".into(),
            "collapse".into(),
            "-a".into(),
            path_arg(&a_file),
            "-b".into(),
            path_arg(&b_file),
        ])?;

        Self::parse_regions(&lines)
    }

    fn overlap_join(&self, a: &RegionSet, b: &RegionSet) -> ConsensusResult<Vec<(Region, Region)>> {
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }

        let a_file = Self::write_temp(a)?;
        let b_file = Self::write_temp(b)?;

        let lines = self.run(vec![
            "intersect".into(),
            "-wa".into(),
            "-wb".into(),
            "-a".into(),
            path_arg(&a_file),
            "-b".into(),
            path_arg(&b_file),
        ])?;

        // records of `a` share one layout, so the split point is fixed
        let a_columns = 3 + a.regions[0].extra_columns();

        lines
            .iter()
            .map(|line| {
                let fields: Vec<&str> = line.split('\t').collect();
                if fields.len() <= a_columns + 3 {
                    return Err(ConsensusError::EngineOutput(line.clone()));
                }
                let left = Region::from_bed_line(&fields[..a_columns].join("\t"))?;
                let right = Region::from_bed_line(&fields[a_columns..].join("\t"))?;
                Ok((left, right))
            })
            .collect()
    }
}
