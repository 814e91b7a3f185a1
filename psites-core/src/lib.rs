//! Core models for building consensus peak catalogs.
//!
//! This crate holds the record types every other `psites` crate shares:
//!
//! - [`models::Region`] and [`models::RegionSet`]: plain BED-like interval records
//! - [`models::ClassifiedPeak`] and [`models::Sample`]: per-sample peak calls whose
//!   name carries a classification code (`"<base>:<class>"`)
//! - [`models::GeneFeature`]: reference gene/exon records with a strand
//!
//! Reading is done from plain or gzipped BED files; see [`utils::get_dynamic_reader`].
//!
//! ```
//! use psites_core::models::{Region, RegionSet};
//!
//! let rs = RegionSet::from(vec![
//!     Region { chr: "chr1".to_string(), start: 100, end: 110, rest: Some("a:1\t0\t+".to_string()) },
//! ]);
//! assert_eq!(rs.len(), 1);
//! assert_eq!(rs.regions[0].column(4), Some("a:1"));
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{RegionSetError, RegionSetResult};
