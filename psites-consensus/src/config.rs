use std::collections::BTreeSet;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ConsensusError, ConsensusResult};

/// Classification codes a peak may carry.
pub const VALID_CLASSES: std::ops::RangeInclusive<i64> = 1..=4;

pub const DEFAULT_CUTOFF: u32 = 2;
pub const DEFAULT_MERGE_GAP: u32 = 2;
pub const DEFAULT_BEDTOOLS: &str = "bedtools";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Native,
    Bedtools,
}

///
/// Settings of one consensus run.
///
/// Every field has a default, so a TOML file only needs the values it changes:
///
/// ```toml
/// classes = [1, 2]
/// cutoff = 3
/// engine = "bedtools"
/// timeout_secs = 600
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Accepted classification codes, each in 1..=4.
    pub classes: Vec<i64>,
    /// Minimum number of distinct samples supporting a consensus position.
    pub cutoff: u32,
    /// Clusters closer than or exactly this many base pairs are merged.
    pub merge_gap: u32,
    pub engine: EngineKind,
    /// Executable used by the bedtools engine.
    pub bedtools: PathBuf,
    /// Per-invocation limit for the bedtools engine.
    pub timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            classes: vec![1],
            cutoff: DEFAULT_CUTOFF,
            merge_gap: DEFAULT_MERGE_GAP,
            engine: EngineKind::default(),
            bedtools: PathBuf::from(DEFAULT_BEDTOOLS),
            timeout_secs: None,
        }
    }
}

impl TryFrom<&Path> for PipelineConfig {
    type Error = ConsensusError;

    fn try_from(path: &Path) -> ConsensusResult<Self> {
        let toml_str = read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

impl PipelineConfig {
    ///
    /// Check the config and return the accepted class set.
    ///
    pub fn validate(&self) -> ConsensusResult<BTreeSet<i64>> {
        if self.cutoff == 0 {
            return Err(ConsensusError::InvalidCutoff(self.cutoff));
        }
        if self.classes.is_empty() {
            return Err(ConsensusError::InvalidConfig(
                "at least one accepted class is required".to_string(),
            ));
        }

        self.classes
            .iter()
            .map(|&c| match VALID_CLASSES.contains(&c) {
                true => Ok(c),
                false => Err(ConsensusError::ClassOutOfRange(c)),
            })
            .collect()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
