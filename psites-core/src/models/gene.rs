use crate::errors::{RegionSetError, RegionSetResult};
use crate::models::{Region, Strand};

///
/// A reference gene or exon record: BED6 with the gene symbol as name.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GeneFeature {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub gene: String,
    pub score: String,
    pub strand: Strand,
}

impl TryFrom<&Region> for GeneFeature {
    type Error = RegionSetError;

    fn try_from(region: &Region) -> RegionSetResult<Self> {
        Ok(GeneFeature {
            chr: region.chr.clone(),
            start: region.start,
            end: region.end,
            gene: region.required_column(4)?.to_string(),
            score: region.required_column(5)?.to_string(),
            strand: region.required_column(6)?.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_region() {
        let region = Region::from_bed_line("chr1\t0\t200\tGENE1\t0\t+").unwrap();
        let gene = GeneFeature::try_from(&region).unwrap();
        assert_eq!(gene.gene, "GENE1");
        assert_eq!(gene.strand, Strand::Forward);

        let bed4 = Region::from_bed_line("chr1\t0\t200\tGENE1").unwrap();
        assert!(GeneFeature::try_from(&bed4).is_err());
    }
}
