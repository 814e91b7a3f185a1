use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use rstest::*;

use psites_consensus::annotator::ConsensusAnnotator;
use psites_consensus::builder::ConsensusBuilder;
use psites_consensus::classifier::classify;
use psites_consensus::config::PipelineConfig;
use psites_consensus::engine::{IntervalEngine, NativeEngine};
use psites_consensus::errors::ConsensusError;
use psites_consensus::models::{ConsensusRegion, GeneAssignedPeak};
use psites_consensus::pipeline::{ConsensusPipeline, load_samples};
use psites_core::models::{ClassifiedPeak, Region, RegionSet, Sample, Strand};

#[fixture]
fn path_to_data() -> &'static str {
    "tests/data"
}

#[fixture]
fn sample_files(path_to_data: &str) -> Vec<PathBuf> {
    ["S1.peaks.bed", "S2_rep1.peaks.bed", "S3.peaks.bed"]
        .iter()
        .map(|f| Path::new(path_to_data).join(f))
        .collect()
}

#[fixture]
fn path_to_genes(path_to_data: &str) -> PathBuf {
    Path::new(path_to_data).join("genes.bed")
}

fn peak(start: u32, end: u32, name: &str) -> ClassifiedPeak {
    ClassifiedPeak {
        chr: "chr1".to_string(),
        start,
        end,
        name: name.to_string(),
        score: "0".to_string(),
        strand: Strand::Forward,
    }
}

fn gene(name: &str, strand: &str) -> RegionSet {
    RegionSet::from(vec![Region {
        chr: "chr1".to_string(),
        start: 0,
        end: 1000,
        rest: Some(format!("{}\t0\t{}", name, strand)),
    }])
}

fn pipeline(classes: Vec<i64>, cutoff: u32) -> ConsensusPipeline {
    let config = PipelineConfig {
        classes,
        cutoff,
        ..Default::default()
    };
    ConsensusPipeline::new(config, Box::new(NativeEngine))
}

fn rendered(peaks: &[GeneAssignedPeak]) -> Vec<String> {
    peaks.iter().map(|p| p.to_string()).collect()
}

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[fixture]
    fn identical_samples() -> Vec<Sample> {
        (1..=3)
            .map(|i| Sample::new(format!("S{}", i), vec![peak(100, 110, &format!("s{}:1", i))]))
            .collect()
    }

    #[rstest]
    fn test_three_identical_samples(identical_samples: Vec<Sample>) {
        let peaks = pipeline(vec![1], 2)
            .run(&gene("GENE1", "+"), &identical_samples)
            .unwrap();
        assert_eq!(rendered(&peaks), vec!["chr1\t100\t110\tp.c1.GENE1.1\t0\t+"]);
    }

    #[rstest]
    fn test_cutoff_above_sample_count(identical_samples: Vec<Sample>) {
        let peaks = pipeline(vec![1], 4)
            .run(&gene("GENE1", "+"), &identical_samples)
            .unwrap();
        assert!(peaks.is_empty());
    }

    #[rstest]
    fn test_reverse_strand_gene() {
        let samples: Vec<Sample> = (1..=3)
            .map(|i| {
                Sample::new(
                    format!("S{}", i),
                    vec![peak(100, 110, "a:1"), peak(200, 210, "b:1")],
                )
            })
            .collect();

        let peaks = pipeline(vec![1], 2).run(&gene("GENEM", "-"), &samples).unwrap();
        assert_eq!(
            rendered(&peaks),
            vec![
                "chr1\t100\t110\tp.c1.GENEM.2\t0\t-",
                "chr1\t200\t210\tp.c1.GENEM.1\t0\t-",
            ]
        );
    }

    #[rstest]
    fn test_majority_class_not_accepted_is_filtered() {
        // consensus is built from class 1 peaks, but the region votes 2
        let samples = vec![
            Sample::new("S1", vec![peak(100, 110, "a:1"), peak(100, 110, "b:2")]),
            Sample::new("S2", vec![peak(100, 110, "c:1"), peak(101, 109, "d:2")]),
            Sample::new("S3", vec![peak(102, 108, "e:2")]),
        ];
        let peaks = pipeline(vec![1], 2).run(&gene("GENE1", "+"), &samples).unwrap();
        assert!(peaks.is_empty());
    }

    #[rstest]
    fn test_files_class_one(sample_files: Vec<PathBuf>, path_to_genes: PathBuf) {
        let peaks = pipeline(vec![1], 2)
            .run_files(&path_to_genes, &sample_files)
            .unwrap();
        assert_eq!(
            rendered(&peaks),
            vec![
                "chr1\t102\t110\tp.c1.GENE1.1\t0\t+",
                "chr1\t1005\t1020\tp.c1.GENE2.1\t0\t-",
            ]
        );
    }

    #[rstest]
    fn test_files_classes_one_and_three(sample_files: Vec<PathBuf>, path_to_genes: PathBuf) {
        let peaks = pipeline(vec![1, 3], 2)
            .run_files(&path_to_genes, &sample_files)
            .unwrap();
        assert_eq!(
            rendered(&peaks),
            vec![
                "chr1\t102\t110\tp.c1.GENE1.1\t0\t+",
                "chr1\t1005\t1020\tp.c1.GENE2.1\t0\t-",
                "chr2\t505\t520\tp.c3.GENE3.1\t0\t+",
                "chr2\t505\t520\tp.c3.GENE4.1\t0\t-",
            ]
        );
        assert_eq!(peaks[2].region_id, "peak_2");
    }

    #[rstest]
    fn test_duplicate_sample_files(sample_files: Vec<PathBuf>, path_to_genes: PathBuf) {
        let files = vec![sample_files[0].clone(), sample_files[0].clone()];
        let result = pipeline(vec![1], 2).run_files(&path_to_genes, &files);
        assert!(matches!(
            result,
            Err(ConsensusError::DuplicateSampleId { .. })
        ));
    }

    #[rstest]
    fn test_unaccepted_large_class_code() {
        let samples: Vec<Sample> = (1..=3)
            .map(|i| {
                Sample::new(
                    format!("S{}", i),
                    vec![peak(100, 110, "a:1"), peak(5000, 5010, "far:300")],
                )
            })
            .collect();

        let peaks = pipeline(vec![1], 2).run(&gene("GENE1", "+"), &samples).unwrap();
        assert_eq!(rendered(&peaks), vec!["chr1\t100\t110\tp.c1.GENE1.1\t0\t+"]);
    }

    #[rstest]
    fn test_sample_file_without_peaks(path_to_genes: PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = [
            ("S1.bed", "chr1\t100\t110\ta:1\t0\t+\n"),
            ("S2.bed", "chr1\t100\t110\tb:1\t0\t+\n"),
            ("S3.bed", ""),
        ]
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        })
        .collect();

        let peaks = pipeline(vec![1], 2).run_files(&path_to_genes, &files).unwrap();
        assert_eq!(rendered(&peaks), vec!["chr1\t100\t110\tp.c1.GENE1.1\t0\t+"]);
    }

    #[rstest]
    fn test_bad_class_code_is_fatal() {
        let samples = vec![
            Sample::new("S1", vec![peak(100, 110, "a:1")]),
            Sample::new("S2", vec![peak(100, 110, "broken")]),
        ];
        let err = pipeline(vec![1], 2)
            .run(&gene("GENE1", "+"), &samples)
            .unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidClassCode(ref name) if name == "broken"));
    }
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[fixture]
    fn samples(sample_files: Vec<PathBuf>) -> Vec<Sample> {
        load_samples(&sample_files).unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    fn test_cutoff_monotonicity(samples: Vec<Sample>, #[case] cutoff: u32) {
        let all: BTreeSet<i64> = (1..=4).collect();
        let filtered: Vec<Sample> = samples
            .iter()
            .map(|s| Sample::new(s.id.clone(), classify(&s.peaks, &all).unwrap()))
            .collect();

        let loose = ConsensusBuilder::new(&NativeEngine, cutoff).build(&filtered).unwrap();
        let strict = ConsensusBuilder::new(&NativeEngine, cutoff + 1)
            .build(&filtered)
            .unwrap();

        assert!(!strict.is_empty());
        for region in &strict {
            assert!(
                loose.iter().any(|r| r.chr == region.chr
                    && r.start <= region.start
                    && region.end <= r.end),
                "{:?} not covered at cutoff {}",
                region,
                cutoff
            );
        }
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(100)]
    fn test_merge_idempotence(samples: Vec<Sample>, #[case] gap: u32) {
        let peaks = RegionSet::from(
            samples
                .iter()
                .flat_map(|s| s.to_region_set().regions)
                .collect::<Vec<_>>(),
        );

        let once = NativeEngine.merge(&peaks, gap).unwrap();
        let twice = NativeEngine.merge(&once, gap).unwrap();
        assert_eq!(once.regions, twice.regions);
    }

    fn region() -> ConsensusRegion {
        ConsensusRegion {
            id: "peak_0".to_string(),
            chr: "chr1".to_string(),
            start: 100,
            end: 110,
            support_count: 2,
        }
    }

    fn resolved(samples: &[Sample]) -> String {
        let annotated = ConsensusAnnotator::new(&NativeEngine)
            .annotate(&[region()], samples)
            .unwrap();
        assert_eq!(annotated.len(), 1);
        annotated[0].resolved_class.clone()
    }

    #[rstest]
    fn test_vote_ignores_sample_order() {
        let samples = vec![
            Sample::new("S1", vec![peak(100, 110, "a:2")]),
            Sample::new("S2", vec![peak(102, 108, "b:1")]),
            Sample::new("S3", vec![peak(104, 112, "c:1")]),
        ];
        let expected = resolved(&samples);
        assert_eq!(expected, "1");

        for order in [[2, 1, 0], [1, 0, 2], [0, 2, 1]] {
            let reordered: Vec<Sample> = order.iter().map(|&i| samples[i].clone()).collect();
            assert_eq!(resolved(&reordered), expected);
        }
    }

    #[rstest]
    fn test_vote_tie_goes_to_first_sample() {
        let s1 = Sample::new("S1", vec![peak(100, 110, "a:2")]);
        let s2 = Sample::new("S2", vec![peak(100, 110, "b:3")]);

        assert_eq!(resolved(&[s1.clone(), s2.clone()]), "2");
        assert_eq!(resolved(&[s2, s1]), "3");
    }

    #[rstest]
    fn test_ordinals_and_dedup(sample_files: Vec<PathBuf>, path_to_genes: PathBuf) {
        let peaks = pipeline(vec![1, 2, 3, 4], 1)
            .run_files(&path_to_genes, &sample_files)
            .unwrap();
        assert!(!peaks.is_empty());

        let mut ordinals: BTreeMap<(String, String, Strand), Vec<u32>> = BTreeMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for p in &peaks {
            ordinals
                .entry((p.chr.clone(), p.gene.clone(), p.strand))
                .or_default()
                .push(p.ordinal);
            assert!(seen.insert((p.gene.clone(), p.region_id.clone())));
        }

        for ((_, gene, _), mut numbers) in ordinals {
            numbers.sort_unstable();
            let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
            assert_eq!(numbers, expected, "ordinals of {}", gene);
        }
    }
}
