//! Genome-wide overlap index built from a [`RegionSet`].
//!
//! [`MultiChromOverlapper`] keeps one [`AIList`] per chromosome. Each stored
//! interval carries the position of its record in the source set, so callers
//! can get back to the full record (name, score, strand, ...) of every hit.
//!
//! # Examples
//!
//! ```
//! use psites_overlaprs::IntoMultiChromOverlapper;
//! use psites_core::models::{Region, RegionSet};
//!
//! let genes = RegionSet::from(vec![
//!     Region { chr: "chr1".to_string(), start: 1000, end: 2000, rest: Some("BRCA1".to_string()) },
//!     Region { chr: "chr1".to_string(), start: 5000, end: 6000, rest: Some("TP53".to_string()) },
//!     Region { chr: "chr2".to_string(), start: 1000, end: 3000, rest: Some("EGFR".to_string()) },
//! ]);
//!
//! let index = (&genes).into_multi_chrom_overlapper();
//! let query = Region { chr: "chr1".to_string(), start: 1500, end: 5500, rest: None };
//!
//! assert_eq!(index.find_record_indices(&query), vec![0, 1]);
//! ```

use std::collections::HashMap;

use num_traits::{PrimInt, Unsigned};
use psites_core::models::{Interval, Region, RegionSet};
use thiserror::Error;

use crate::{AIList, Overlapper};

/// Errors that can occur when building a [`MultiChromOverlapper`].
#[derive(Debug, Error)]
pub enum MultiChromOverlapperError {
    /// A record whose end lies before its start cannot be indexed.
    #[error("Invalid interval {chr}:{start}-{end}")]
    InvalidInterval { chr: String, start: u32, end: u32 },
}

/// A genome-wide index for overlap queries across multiple chromosomes.
pub struct MultiChromOverlapper<I, T> {
    index_maps: HashMap<String, Box<dyn Overlapper<I, T>>>,
}

impl<I, T> MultiChromOverlapper<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Intervals on `chr` overlapping `[start, end)`. Unknown chromosomes yield nothing.
    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        match self.index_maps.get(chr) {
            Some(lapper) => lapper.find_iter(start, end),
            None => Box::new(std::iter::empty()),
        }
    }

    /// Number of indexed intervals across all chromosomes.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MultiChromOverlapper<u32, usize> {
    ///
    /// Positions (in the indexed set) of every record overlapping `region`,
    /// ascending, so hits come back in the indexed file's order.
    ///
    pub fn find_record_indices(&self, region: &Region) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .find_iter(&region.chr, region.start, region.end)
            .map(|iv| iv.val)
            .collect();
        hits.sort_unstable();
        hits
    }
}

/// Conversion of region-based data into a [`MultiChromOverlapper`].
pub trait IntoMultiChromOverlapper<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn into_multi_chrom_overlapper(self) -> MultiChromOverlapper<I, T>;
}

impl IntoMultiChromOverlapper<u32, usize> for &RegionSet {
    fn into_multi_chrom_overlapper(self) -> MultiChromOverlapper<u32, usize> {
        // STEP 1: organize intervals per chromosome, tagged with the record position
        let mut intervals: HashMap<String, Vec<Interval<u32, usize>>> = HashMap::default();
        for (idx, region) in self.regions.iter().enumerate() {
            intervals
                .entry(region.chr.clone())
                .or_default()
                .push(Interval {
                    start: region.start,
                    end: region.end,
                    val: idx,
                });
        }

        // STEP 2: one AIList per chromosome
        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| {
                let lapper: Box<dyn Overlapper<u32, usize>> =
                    Box::new(AIList::build(chr_intervals));
                (chr, lapper)
            })
            .collect();

        MultiChromOverlapper { index_maps }
    }
}

///
/// Build an index, rejecting records with `end < start`.
///
pub fn try_index_region_set(
    rs: &RegionSet,
) -> Result<MultiChromOverlapper<u32, usize>, MultiChromOverlapperError> {
    if let Some(bad) = rs.iter().find(|r| r.end < r.start) {
        return Err(MultiChromOverlapperError::InvalidInterval {
            chr: bad.chr.clone(),
            start: bad.start,
            end: bad.end,
        });
    }
    Ok(rs.into_multi_chrom_overlapper())
}
