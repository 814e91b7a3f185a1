//! Consensus regions from per-sample peaks.
//!
//! Spans of constant sample coverage are computed across all samples, spans
//! with too little support are dropped, and the survivors are merged into
//! regions named `peak_0`, `peak_1`, ... in scan order.

use log::debug;
use psites_core::models::{Region, RegionSet, Sample};

use crate::config::DEFAULT_MERGE_GAP;
use crate::engine::IntervalEngine;
use crate::errors::{ConsensusError, ConsensusResult};
use crate::models::{ConsensusRegion, REGION_ID_PREFIX};

pub struct ConsensusBuilder<'a> {
    engine: &'a dyn IntervalEngine,
    cutoff: u32,
    merge_gap: u32,
}

impl<'a> ConsensusBuilder<'a> {
    pub fn new(engine: &'a dyn IntervalEngine, cutoff: u32) -> Self {
        ConsensusBuilder {
            engine,
            cutoff,
            merge_gap: DEFAULT_MERGE_GAP,
        }
    }

    pub fn with_merge_gap(mut self, merge_gap: u32) -> Self {
        self.merge_gap = merge_gap;
        self
    }

    ///
    /// Build the consensus regions of `samples`.
    ///
    /// No surviving span gives an empty result, not an error.
    ///
    pub fn build(&self, samples: &[Sample]) -> ConsensusResult<Vec<ConsensusRegion>> {
        if self.cutoff == 0 {
            return Err(ConsensusError::InvalidCutoff(self.cutoff));
        }

        let named: Vec<(String, RegionSet)> = samples
            .iter()
            .map(|s| (s.id.clone(), s.to_region_set()))
            .collect();

        let spans = self.engine.multi_coverage(&named)?;
        let supported: Vec<_> = spans
            .into_iter()
            .filter(|span| span.num >= self.cutoff)
            .collect();

        debug!(
            "{} spans reach a support of {} samples",
            supported.len(),
            self.cutoff
        );

        if supported.is_empty() {
            return Ok(Vec::new());
        }

        let span_set = RegionSet::from(
            supported
                .iter()
                .map(|span| Region {
                    chr: span.chr.clone(),
                    start: span.start,
                    end: span.end,
                    rest: None,
                })
                .collect::<Vec<_>>(),
        );
        let merged = self.engine.merge(&span_set, self.merge_gap)?;

        // support of a merged region: best support among the spans inside it
        let regions = merged
            .iter()
            .enumerate()
            .map(|(i, region)| ConsensusRegion {
                id: format!("{}{}", REGION_ID_PREFIX, i),
                chr: region.chr.clone(),
                start: region.start,
                end: region.end,
                support_count: supported
                    .iter()
                    .filter(|span| {
                        span.chr == region.chr && span.start >= region.start && span.end <= region.end
                    })
                    .map(|span| span.num)
                    .max()
                    .unwrap_or(self.cutoff),
            })
            .collect();

        Ok(regions)
    }
}
