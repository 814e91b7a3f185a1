//! Interval-set engines.
//!
//! The consensus pipeline only needs four interval-set operations. They are
//! expressed by [`IntervalEngine`] so the pipeline can run either fully in
//! process ([`NativeEngine`]) or on top of an installed `bedtools`
//! ([`BedtoolsEngine`]). Both follow the same contract, including the
//! "no rows at all" result of [`IntervalEngine::overlap_aggregate`] when
//! nothing overlaps.

pub mod bedtools;
pub mod native;

use psites_core::models::{Region, RegionSet};

use crate::config::{EngineKind, PipelineConfig};
use crate::errors::ConsensusResult;

pub use self::bedtools::BedtoolsEngine;
pub use self::native::NativeEngine;

/// Column holding the record name in BED files.
pub const NAME_COLUMN: usize = 4;

/// Placeholder written by an aggregate overlap for a record without hits.
pub const NO_OVERLAP: &str = ".";

/// A maximal span over which the set of covering samples does not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSpan {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    /// Number of distinct samples covering the span.
    pub num: u32,
    /// One flag per input sample, in input order.
    pub presence: Vec<bool>,
}

pub trait IntervalEngine {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    ///
    /// Multi-sample coverage: one [`CoverageSpan`] per maximal span with an
    /// unchanged set of covering samples, sorted by chromosome then start.
    /// Spans covered by no sample are not reported.
    ///
    fn multi_coverage(&self, samples: &[(String, RegionSet)]) -> ConsensusResult<Vec<CoverageSpan>>;

    ///
    /// Union of intervals closer than or exactly `gap` base pairs apart.
    /// The result is sorted and carries only coordinates.
    ///
    fn merge(&self, regions: &RegionSet, gap: u32) -> ConsensusResult<RegionSet>;

    ///
    /// Every record of `a` with one more column: the comma-joined `column`
    /// values of the `b` records it overlaps, or `.` when it overlaps none.
    /// When no record of `a` overlaps anything, the result has no rows at all.
    ///
    fn overlap_aggregate(&self, a: &RegionSet, b: &RegionSet, column: usize)
    -> ConsensusResult<RegionSet>;

    ///
    /// One `(a, b)` pair per overlapping record pair, in `a` order and then `b` order.
    ///
    fn overlap_join(&self, a: &RegionSet, b: &RegionSet) -> ConsensusResult<Vec<(Region, Region)>>;
}

///
/// Engine selected by the config.
///
pub fn engine_from_config(config: &PipelineConfig) -> Box<dyn IntervalEngine> {
    match config.engine {
        EngineKind::Native => Box::new(NativeEngine),
        EngineKind::Bedtools => Box::new(BedtoolsEngine::new(
            config.bedtools.clone(),
            config.timeout(),
        )),
    }
}
