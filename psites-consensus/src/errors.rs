use std::time::Duration;

use psites_core::RegionSetError;
use psites_overlaprs::multi_chrom_overlapper::MultiChromOverlapperError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("Classification code of peak '{0}' is not an integer")]
    InvalidClassCode(String),

    #[error("Accepted class {0} is outside 1..=4")]
    ClassOutOfRange(i64),

    #[error("Duplicate sample id '{id}' (from {first} and {second})")]
    DuplicateSampleId {
        id: String,
        first: String,
        second: String,
    },

    #[error("Sample support cutoff must be at least 1, got {0}")]
    InvalidCutoff(u32),

    #[error("Invalid pipeline config: {0}")]
    InvalidConfig(String),

    #[error("Interval engine command `{command}` failed: {diagnostic}")]
    EngineInvocation { command: String, diagnostic: String },

    #[error("Interval engine command `{command}` did not finish within {timeout:?}")]
    EngineTimeout { command: String, timeout: Duration },

    #[error("Malformed interval engine output: {0}")]
    EngineOutput(String),

    #[error("Can't name the compared samples from file name: {0}")]
    InvalidComparisonName(String),

    #[error("Malformed table {path}: {reason}")]
    MalformedTable { path: String, reason: String },

    #[error(transparent)]
    RegionSet(#[from] RegionSetError),

    #[error(transparent)]
    Overlapper(#[from] MultiChromOverlapperError),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConsensusError {
    /// Configuration problems are detected before any engine call is made.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ConsensusError::InvalidClassCode(_)
                | ConsensusError::ClassOutOfRange(_)
                | ConsensusError::DuplicateSampleId { .. }
                | ConsensusError::InvalidCutoff(_)
                | ConsensusError::InvalidConfig(_)
                | ConsensusError::InvalidComparisonName(_)
                | ConsensusError::Toml(_)
        )
    }
}

pub type ConsensusResult<T> = std::result::Result<T, ConsensusError>;
