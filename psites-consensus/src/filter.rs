use std::collections::BTreeSet;

use crate::errors::{ConsensusError, ConsensusResult};
use crate::models::GeneAssignedPeak;

///
/// Class of a rendered peak name, `p.c<class>.<gene>.<ordinal>`.
///
pub fn class_from_name(name: &str) -> ConsensusResult<i64> {
    name.split('.')
        .nth(1)
        .and_then(|segment| segment.strip_prefix('c'))
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| ConsensusError::InvalidClassCode(name.to_string()))
}

///
/// Final class filter over gene-assigned peaks.
///
pub struct OutputFilter {
    accepted: BTreeSet<i64>,
}

impl OutputFilter {
    pub fn new(accepted: BTreeSet<i64>) -> Self {
        OutputFilter { accepted }
    }

    /// Peaks whose rendered class is accepted, order kept.
    pub fn filter(&self, peaks: Vec<GeneAssignedPeak>) -> ConsensusResult<Vec<GeneAssignedPeak>> {
        let mut kept = Vec::with_capacity(peaks.len());
        for peak in peaks {
            if self.accepted.contains(&class_from_name(&peak.name())?) {
                kept.push(peak);
            }
        }
        Ok(kept)
    }
}
