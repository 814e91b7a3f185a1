use std::path::Path;

use crate::errors::RegionSetResult;
use crate::models::{ClassifiedPeak, Region, RegionSet};
use crate::utils::{get_dynamic_reader, sample_id_from_path};

///
/// All peak calls of one sample, in file order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: String,
    pub peaks: Vec<ClassifiedPeak>,
}

impl Sample {
    pub fn new(id: impl Into<String>, peaks: Vec<ClassifiedPeak>) -> Self {
        Sample {
            id: id.into(),
            peaks,
        }
    }

    ///
    /// Read a classified peak file (BED6, plain or gzipped). The sample id is
    /// taken from the file name, see [`sample_id_from_path`]. A file without
    /// records is a sample without peaks.
    ///
    pub fn from_path(path: &Path) -> RegionSetResult<Self> {
        let id = sample_id_from_path(path)?;
        let rs = RegionSet::from_reader(get_dynamic_reader(path)?)?;
        let peaks = rs
            .iter()
            .map(ClassifiedPeak::try_from)
            .collect::<RegionSetResult<Vec<_>>>()?;

        Ok(Sample { id, peaks })
    }

    /// BED6 records of every peak, in sample order.
    pub fn to_region_set(&self) -> RegionSet {
        peaks_to_region_set(&self.peaks)
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// BED6 records of a peak slice.
pub fn peaks_to_region_set(peaks: &[ClassifiedPeak]) -> RegionSet {
    RegionSet::from(peaks.iter().map(ClassifiedPeak::to_region).collect::<Vec<Region>>())
}
