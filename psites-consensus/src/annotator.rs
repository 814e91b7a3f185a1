//! Classification of consensus regions by majority vote across samples.

use fxhash::FxHashMap;
use log::debug;
use psites_core::models::{RegionSet, Sample, class_label};

use crate::engine::{IntervalEngine, NAME_COLUMN, NO_OVERLAP};
use crate::errors::ConsensusResult;
use crate::models::{AnnotatedRegion, ConsensusRegion};

///
/// Most frequent vote. On a tie the candidate seen first wins.
///
/// Returns `None` for an empty vote list.
///
pub fn majority_vote<S: AsRef<str>>(votes: &[S]) -> Option<String> {
    // (candidate, count) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for vote in votes {
        let vote = vote.as_ref();
        match tally.iter_mut().find(|(candidate, _)| *candidate == vote) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote, 1)),
        }
    }

    let mut winner: Option<(&str, usize)> = None;
    for (candidate, count) in tally {
        if winner.is_none_or(|(_, best)| count > best) {
            winner = Some((candidate, count));
        }
    }

    winner.map(|(candidate, _)| candidate.to_string())
}

pub struct ConsensusAnnotator<'a> {
    engine: &'a dyn IntervalEngine,
}

impl<'a> ConsensusAnnotator<'a> {
    pub fn new(engine: &'a dyn IntervalEngine) -> Self {
        ConsensusAnnotator { engine }
    }

    ///
    /// Collect, for every region, the class of each overlapping peak of every
    /// sample, then resolve the region's class by [`majority_vote`].
    ///
    /// Samples are folded in the given order. A sample that overlaps no region
    /// at all leaves the accumulated columns untouched. Regions without a
    /// single vote are dropped; the others keep their order.
    ///
    pub fn annotate(
        &self,
        regions: &[ConsensusRegion],
        samples: &[Sample],
    ) -> ConsensusResult<Vec<AnnotatedRegion>> {
        if regions.is_empty() {
            return Ok(Vec::new());
        }

        let mut working = RegionSet::from(
            regions
                .iter()
                .map(ConsensusRegion::to_region)
                .collect::<Vec<_>>(),
        );

        for sample in samples {
            let mut peaks = sample.to_region_set();
            peaks.sort();

            let annotated = self.engine.overlap_aggregate(&working, &peaks, NAME_COLUMN)?;
            match annotated.is_empty() {
                true => debug!("sample {} overlaps no consensus region", sample.id),
                false => working = annotated,
            }
        }

        // region id -> votes
        let mut votes: FxHashMap<String, Vec<String>> = FxHashMap::default();
        for record in &working {
            let id = record.required_column(NAME_COLUMN)?.to_string();
            let region_votes: Vec<String> = record
                .rest
                .as_deref()
                .unwrap_or_default()
                .split('\t')
                .skip(1)
                .filter(|col| *col != NO_OVERLAP)
                .flat_map(|col| col.split(','))
                .filter(|name| !name.is_empty())
                .map(|name| class_label(name).to_string())
                .collect();
            votes.insert(id, region_votes);
        }

        let annotated: Vec<AnnotatedRegion> = regions
            .iter()
            .filter_map(|region| {
                let classification_votes = votes.remove(&region.id)?;
                let resolved_class = majority_vote(&classification_votes)?;
                Some(AnnotatedRegion {
                    region: region.clone(),
                    classification_votes,
                    resolved_class,
                })
            })
            .collect();

        debug!(
            "{} of {} regions carry at least one classification vote",
            annotated.len(),
            regions.len()
        );

        Ok(annotated)
    }
}
