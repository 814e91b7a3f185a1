use std::fmt::{self, Display};

use psites_core::models::{Region, Strand};

/// Prefix of consensus region identifiers (`peak_0`, `peak_1`, ...).
pub const REGION_ID_PREFIX: &str = "peak_";

/// A region supported by at least `cutoff` samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRegion {
    pub id: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    /// Highest number of distinct samples covering any position of the region.
    pub support_count: u32,
}

impl ConsensusRegion {
    /// BED4 form, with the id as name.
    pub fn to_region(&self) -> Region {
        Region {
            chr: self.chr.clone(),
            start: self.start,
            end: self.end,
            rest: Some(self.id.clone()),
        }
    }
}

/// A consensus region with the classification votes of every overlapping sample peak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRegion {
    pub region: ConsensusRegion,
    pub classification_votes: Vec<String>,
    pub resolved_class: String,
}

impl AnnotatedRegion {
    /// `"<region_id>:<resolved_class>"`, the name carried into gene assignment.
    pub fn synthetic_name(&self) -> String {
        format!("{}:{}", self.region.id, self.resolved_class)
    }

    /// BED4 form, with the synthetic name.
    pub fn to_region(&self) -> Region {
        Region {
            chr: self.region.chr.clone(),
            start: self.region.start,
            end: self.region.end,
            rest: Some(self.synthetic_name()),
        }
    }
}

/// A consensus region placed within a gene, numbered along the gene's strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAssignedPeak {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub gene: String,
    /// 1-based position among the gene's peaks on one strand, 5' to 3'.
    pub ordinal: u32,
    pub region_id: String,
    pub resolved_class: String,
    pub strand: Strand,
}

impl GeneAssignedPeak {
    /// `p.c<class>.<gene>.<ordinal>`
    pub fn name(&self) -> String {
        format!("p.c{}.{}.{}", self.resolved_class, self.gene, self.ordinal)
    }

    /// BED6 form: the rendered name, a zero score and the gene's strand.
    pub fn to_region(&self) -> Region {
        Region {
            chr: self.chr.clone(),
            start: self.start,
            end: self.end,
            rest: Some(format!("{}\t0\t{}", self.name(), self.strand)),
        }
    }
}

impl Display for GeneAssignedPeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_region())
    }
}
