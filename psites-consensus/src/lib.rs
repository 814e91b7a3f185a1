//! Consensus peak sites across samples.
//!
//! Given classified peak calls of several samples and a reference of gene
//! features, this crate builds the catalog of consensus sites:
//!
//! 1. [`classifier::classify`] keeps the peaks of the accepted classes
//! 2. [`builder::ConsensusBuilder`] finds regions supported by at least `cutoff` samples
//! 3. [`annotator::ConsensusAnnotator`] classifies every region by majority vote
//! 4. [`assigner::GeneAssigner`] numbers the regions along each overlapping gene
//! 5. [`filter::OutputFilter`] drops sites whose resolved class is not accepted
//!
//! [`pipeline::ConsensusPipeline`] runs all of them. Interval arithmetic is
//! delegated to an [`engine::IntervalEngine`], either in process or through
//! `bedtools`.
//!
//! # Example
//!
//! ```
//! use psites_consensus::config::PipelineConfig;
//! use psites_consensus::engine::NativeEngine;
//! use psites_consensus::pipeline::ConsensusPipeline;
//! use psites_core::models::{ClassifiedPeak, Region, RegionSet, Sample, Strand};
//!
//! let peak = ClassifiedPeak {
//!     chr: "chr1".to_string(),
//!     start: 100,
//!     end: 110,
//!     name: "site_1:1".to_string(),
//!     score: "0".to_string(),
//!     strand: Strand::Forward,
//! };
//! let samples = vec![
//!     Sample::new("S1", vec![peak.clone()]),
//!     Sample::new("S2", vec![peak]),
//! ];
//! let genes = RegionSet::from(vec![Region {
//!     chr: "chr1".to_string(),
//!     start: 0,
//!     end: 1000,
//!     rest: Some("GENE1\t0\t+".to_string()),
//! }]);
//!
//! let pipeline = ConsensusPipeline::new(PipelineConfig::default(), Box::new(NativeEngine));
//! let sites = pipeline.run(&genes, &samples).unwrap();
//!
//! assert_eq!(sites[0].to_string(), "chr1\t100\t110\tp.c1.GENE1.1\t0\t+");
//! ```
pub mod annotator;
pub mod assigner;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod interactions;
pub mod models;
pub mod pipeline;

// re-exports
pub use config::PipelineConfig;
pub use errors::{ConsensusError, ConsensusResult};
pub use pipeline::ConsensusPipeline;
