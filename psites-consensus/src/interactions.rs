//! Interaction results restricted to primary sites.
//!
//! A results table holds pairwise site tests between two samples (`SiteA`,
//! `SiteB` columns). The primary site table flags, per sample and strand,
//! which sites are primary:
//!
//! ```text
//! site    PA12.pos    PA12.neg    MP51.pos    MP51.neg
//! 17      1           0           0           0
//! 18      0           0           1           0
//! ```
//!
//! A result row is kept when either site is primary in either compared sample.
//! A site missing from the primary table counts as not primary, so a row whose
//! other site is primary is still kept.

use std::io::{BufRead, Write};
use std::path::Path;

use fxhash::FxHashMap;
use log::debug;
use psites_core::utils::get_dynamic_reader;
use regex::Regex;

use crate::errors::{ConsensusError, ConsensusResult};

/// Sample token in a results file name, e.g. `PA12` in `PA12_MP51.pos.txt`.
const SAMPLE_TOKEN: &str = r"(\w{2}\d+)[_.]";

pub const SITE_A: &str = "SiteA";
pub const SITE_B: &str = "SiteB";

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    match value.parse::<f64>() {
        Ok(n) => n != 0.0,
        Err(_) => matches!(value.to_ascii_lowercase().as_str(), "true" | "t" | "yes" | "y"),
    }
}

///
/// The two primary-table columns a results file compares, `<sample>.<strand>`.
///
/// Samples are the first two sample tokens of the file name; the strand is
/// `pos` when the name mentions it and `neg` otherwise.
///
pub fn comparison_columns(results: &Path) -> ConsensusResult<(String, String)> {
    let file_name = results
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| ConsensusError::InvalidComparisonName(results.display().to_string()))?;

    let re = Regex::new(SAMPLE_TOKEN)?;
    let samples: Vec<&str> = re
        .captures_iter(file_name)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .take(2)
        .collect();

    let [a, b] = samples.as_slice() else {
        return Err(ConsensusError::InvalidComparisonName(file_name.to_string()));
    };
    let strand = match file_name.contains("pos") {
        true => "pos",
        false => "neg",
    };

    Ok((format!("{}.{}", a, strand), format!("{}.{}", b, strand)))
}

///
/// Primary site flags: column name -> site index -> flag.
///
#[derive(Debug, Default)]
pub struct PrimarySiteTable {
    columns: FxHashMap<String, FxHashMap<String, bool>>,
}

impl PrimarySiteTable {
    ///
    /// Read a tab-separated table whose first column is the site index.
    ///
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> ConsensusResult<Self> {
        let mut lines = reader.lines();
        let header = lines.next().transpose()?.ok_or_else(|| ConsensusError::MalformedTable {
            path: source.to_string(),
            reason: "no header line".to_string(),
        })?;
        let names: Vec<String> = header.split('\t').skip(1).map(String::from).collect();

        let mut columns: FxHashMap<String, FxHashMap<String, bool>> = names
            .iter()
            .map(|n| (n.clone(), FxHashMap::default()))
            .collect();

        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let Some(site) = fields.next() else {
                continue;
            };
            for (name, value) in names.iter().zip(fields) {
                if let Some(column) = columns.get_mut(name) {
                    column.insert(site.to_string(), is_truthy(value));
                }
            }
        }

        Ok(PrimarySiteTable { columns })
    }

    /// Read a plain or gzipped table from disk.
    pub fn from_path(path: &Path) -> ConsensusResult<Self> {
        let reader = get_dynamic_reader(path)?;
        Self::from_reader(reader, &path.display().to_string())
    }

    /// Unknown columns and sites are not primary.
    pub fn is_primary(&self, column: &str, site: &str) -> bool {
        self.columns
            .get(column)
            .and_then(|c| c.get(site))
            .copied()
            .unwrap_or(false)
    }
}

///
/// Copy the rows of `results` that involve a primary site of either compared
/// sample to `out`, optionally preceded by the header. Returns the number of
/// rows kept.
///
pub fn filter_interactions<R: BufRead, W: Write>(
    results: R,
    source: &str,
    table: &PrimarySiteTable,
    (a, b): (&str, &str),
    keep_header: bool,
    out: &mut W,
) -> ConsensusResult<usize> {
    let malformed = |reason: &str| ConsensusError::MalformedTable {
        path: source.to_string(),
        reason: reason.to_string(),
    };

    let mut lines = results.lines();
    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| malformed("no header line"))?;
    let columns: Vec<&str> = header.split('\t').collect();
    let site_a = columns
        .iter()
        .position(|c| *c == SITE_A)
        .ok_or_else(|| malformed("missing SiteA column"))?;
    let site_b = columns
        .iter()
        .position(|c| *c == SITE_B)
        .ok_or_else(|| malformed("missing SiteB column"))?;

    if keep_header {
        writeln!(out, "{}", header)?;
    }

    let mut kept = 0;
    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let (Some(x), Some(y)) = (fields.get(site_a), fields.get(site_b)) else {
            debug!("skipping short row: {}", line);
            continue;
        };

        if table.is_primary(a, x)
            || table.is_primary(b, x)
            || table.is_primary(a, y)
            || table.is_primary(b, y)
        {
            writeln!(out, "{}", line)?;
            kept += 1;
        }
    }

    Ok(kept)
}
