use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::RegionSetError;

/// Genomic strand of a peak or gene feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = RegionSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(RegionSetError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Forward)]
    #[case("-", Strand::Reverse)]
    fn test_parse_and_display(#[case] token: &str, #[case] strand: Strand) {
        assert_eq!(token.parse::<Strand>().unwrap(), strand);
        assert_eq!(strand.to_string(), token);
    }

    #[rstest]
    #[case(".")]
    #[case("")]
    #[case("plus")]
    fn test_invalid(#[case] token: &str) {
        assert!(matches!(
            token.parse::<Strand>(),
            Err(RegionSetError::InvalidStrand(_))
        ));
    }
}
