use std::fmt::{self, Display};

use crate::errors::{RegionSetError, RegionSetResult};
use crate::models::{Region, Strand};

///
/// One peak call of one sample.
///
/// The name encodes the peak's classification as a suffix,
/// `"<base>:<class>"`, e.g. `"PA12_site_883:2"`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct ClassifiedPeak {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub score: String,
    pub strand: Strand,
}

impl ClassifiedPeak {
    /// Raw classification suffix: everything after the last `:` of the name.
    pub fn class_label(&self) -> &str {
        class_label(&self.name)
    }

    /// Classification suffix parsed as an integer code.
    pub fn class_code(&self) -> RegionSetResult<i64> {
        self.class_label()
            .parse::<i64>()
            .map_err(|_| RegionSetError::InvalidClassCode(self.name.clone()))
    }

    /// BED6 form of the peak.
    pub fn to_region(&self) -> Region {
        Region {
            chr: self.chr.clone(),
            start: self.start,
            end: self.end,
            rest: Some(format!("{}\t{}\t{}", self.name, self.score, self.strand)),
        }
    }
}

/// Classification suffix of a `"<base>:<class>"` name.
pub fn class_label(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

impl TryFrom<&Region> for ClassifiedPeak {
    type Error = RegionSetError;

    /// Build a peak from a BED6 record (name, score and strand columns are required).
    fn try_from(region: &Region) -> RegionSetResult<Self> {
        Ok(ClassifiedPeak {
            chr: region.chr.clone(),
            start: region.start,
            end: region.end,
            name: region.required_column(4)?.to_string(),
            score: region.required_column(5)?.to_string(),
            strand: region.required_column(6)?.parse()?,
        })
    }
}

impl Display for ClassifiedPeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_region())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn peak(name: &str) -> ClassifiedPeak {
        ClassifiedPeak {
            chr: "chr1".to_string(),
            start: 10,
            end: 20,
            name: name.to_string(),
            score: "0".to_string(),
            strand: Strand::Forward,
        }
    }

    #[rstest]
    #[case("site_1:1", 1)]
    #[case("a:b:3", 3)]
    #[case("4", 4)]
    #[case("far:300", 300)]
    #[case("x:-1", -1)]
    fn test_class_code(#[case] name: &str, #[case] code: i64) {
        assert_eq!(peak(name).class_code().unwrap(), code);
    }

    #[rstest]
    #[case("site_1:x")]
    #[case("site_1:")]
    #[case("site_1")]
    fn test_class_code_not_integer(#[case] name: &str) {
        assert!(matches!(
            peak(name).class_code(),
            Err(RegionSetError::InvalidClassCode(_))
        ));
    }

    #[rstest]
    fn test_from_region() {
        let region = Region::from_bed_line("chr3\t5\t9\tx:2\t13\t-").unwrap();
        let p = ClassifiedPeak::try_from(&region).unwrap();
        assert_eq!(p.name, "x:2");
        assert_eq!(p.score, "13");
        assert_eq!(p.strand, Strand::Reverse);
        assert_eq!(p.to_region(), region);
    }

    #[rstest]
    fn test_from_region_missing_strand() {
        let region = Region::from_bed_line("chr3\t5\t9\tx:2").unwrap();
        assert!(matches!(
            ClassifiedPeak::try_from(&region),
            Err(RegionSetError::MissingColumn { column: 5, .. })
        ));
    }
}
