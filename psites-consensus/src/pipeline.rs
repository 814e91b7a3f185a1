use std::path::Path;

use fxhash::FxHashMap;
use log::{debug, info};
use psites_core::models::{RegionSet, Sample};
use psites_core::utils::sample_id_from_path;

use crate::annotator::ConsensusAnnotator;
use crate::assigner::GeneAssigner;
use crate::builder::ConsensusBuilder;
use crate::classifier::classify;
use crate::config::PipelineConfig;
use crate::engine::IntervalEngine;
use crate::errors::{ConsensusError, ConsensusResult};
use crate::filter::OutputFilter;
use crate::models::GeneAssignedPeak;

///
/// Fail on the first sample id seen twice. `source` names where a sample came from.
///
fn check_unique_ids<'s, I>(ids: I) -> ConsensusResult<()>
where
    I: IntoIterator<Item = (&'s str, String)>,
{
    let mut seen: FxHashMap<&str, String> = FxHashMap::default();
    for (id, source) in ids {
        if let Some(first) = seen.get(id) {
            return Err(ConsensusError::DuplicateSampleId {
                id: id.to_string(),
                first: first.clone(),
                second: source,
            });
        }
        seen.insert(id, source);
    }
    Ok(())
}

///
/// Read the classified peak files of all samples, in the given order.
///
/// Sample ids are derived from the file names and checked for duplicates
/// before any file is read.
///
pub fn load_samples<P: AsRef<Path>>(paths: &[P]) -> ConsensusResult<Vec<Sample>> {
    let ids = paths
        .iter()
        .map(|p| sample_id_from_path(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    check_unique_ids(
        ids.iter()
            .zip(paths)
            .map(|(id, p)| (id.as_str(), p.as_ref().display().to_string())),
    )?;

    let samples = paths
        .iter()
        .map(|p| Sample::from_path(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    for sample in &samples {
        debug!("sample {}: {} peaks", sample.id, sample.len());
    }

    Ok(samples)
}

/// Read the reference gene file (BED6, gene symbol as name).
pub fn load_reference(path: &Path) -> ConsensusResult<RegionSet> {
    Ok(RegionSet::try_from(path)?)
}

///
/// The whole consensus run: class filter, consensus building, majority-vote
/// annotation, gene assignment and the final class filter.
///
pub struct ConsensusPipeline {
    config: PipelineConfig,
    engine: Box<dyn IntervalEngine>,
}

impl ConsensusPipeline {
    pub fn new(config: PipelineConfig, engine: Box<dyn IntervalEngine>) -> Self {
        ConsensusPipeline { config, engine }
    }

    ///
    /// Run every stage. Configuration problems are reported before the
    /// engine is called even once.
    ///
    pub fn run(
        &self,
        reference: &RegionSet,
        samples: &[Sample],
    ) -> ConsensusResult<Vec<GeneAssignedPeak>> {
        let accepted = self.config.validate()?;
        check_unique_ids(
            samples
                .iter()
                .enumerate()
                .map(|(i, s)| (s.id.as_str(), format!("sample #{}", i + 1))),
        )?;

        info!(
            "building consensus of {} samples with the {} engine (classes {:?}, cutoff {})",
            samples.len(),
            self.engine.name(),
            accepted,
            self.config.cutoff
        );

        // class filter; runs over every sample so a bad code fails up front
        let filtered = samples
            .iter()
            .map(|s| Ok(Sample::new(s.id.clone(), classify(&s.peaks, &accepted)?)))
            .collect::<ConsensusResult<Vec<_>>>()?;
        info!(
            "{} peaks pass the class filter",
            filtered.iter().map(Sample::len).sum::<usize>()
        );

        let regions = ConsensusBuilder::new(self.engine.as_ref(), self.config.cutoff)
            .with_merge_gap(self.config.merge_gap)
            .build(&filtered)?;
        info!("{} consensus regions", regions.len());

        // votes come from every peak, not only the accepted classes
        let annotated = ConsensusAnnotator::new(self.engine.as_ref()).annotate(&regions, samples)?;
        info!("{} classified regions", annotated.len());

        let assigned = GeneAssigner::new(self.engine.as_ref()).assign(&annotated, reference)?;
        info!("{} gene assignments", assigned.len());

        let peaks = OutputFilter::new(accepted).filter(assigned)?;
        info!("{} peaks reported", peaks.len());

        Ok(peaks)
    }

    ///
    /// Convenience wrapper reading the reference and sample files first.
    ///
    pub fn run_files<P: AsRef<Path>>(
        &self,
        reference: &Path,
        files: &[P],
    ) -> ConsensusResult<Vec<GeneAssignedPeak>> {
        // validate before touching any file
        self.config.validate()?;
        let samples = load_samples(files)?;
        let reference = load_reference(reference)?;
        self.run(&reference, &samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NativeEngine;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    #[rstest]
    fn test_load_samples_rejects_duplicates() {
        let paths = vec![
            PathBuf::from("/data/S1_rep1.bed"),
            PathBuf::from("/data/S2.bed"),
            PathBuf::from("/data/S1.peaks.bed"),
        ];
        match load_samples(&paths) {
            Err(ConsensusError::DuplicateSampleId { id, first, second }) => {
                assert_eq!(id, "S1");
                assert_eq!(first, "/data/S1_rep1.bed");
                assert_eq!(second, "/data/S1.peaks.bed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    fn test_run_rejects_duplicates() {
        let pipeline = ConsensusPipeline::new(PipelineConfig::default(), Box::new(NativeEngine));
        let samples = vec![Sample::new("S1", vec![]), Sample::new("S1", vec![])];
        let err = pipeline.run(&RegionSet::default(), &samples).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[rstest]
    fn test_run_rejects_bad_classes() {
        let config = PipelineConfig {
            classes: vec![5],
            ..Default::default()
        };
        let pipeline = ConsensusPipeline::new(config, Box::new(NativeEngine));
        assert!(matches!(
            pipeline.run(&RegionSet::default(), &[]),
            Err(ConsensusError::ClassOutOfRange(5))
        ));
    }
}
