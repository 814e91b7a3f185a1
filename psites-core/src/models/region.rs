use std::fmt::{self, Display};

use crate::errors::{RegionSetError, RegionSetResult};

///
/// Region struct, one interval record of a BED-like file.
///
/// Coordinates are 0-based half-open. Any columns past the third are kept
/// verbatim (tab-joined) in `rest`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    ///
    /// Get a 1-based BED column as text. Columns 1-3 are rendered from the
    /// coordinates, so only columns past the third can be borrowed.
    ///
    pub fn column(&self, n: usize) -> Option<&str> {
        if n < 4 {
            return None;
        }
        self.rest.as_deref()?.split('\t').nth(n - 4)
    }

    /// Same as [`Region::column`], but a missing column is an error.
    pub fn required_column(&self, n: usize) -> RegionSetResult<&str> {
        self.column(n).ok_or_else(|| RegionSetError::MissingColumn {
            column: n,
            record: self.as_string(),
        })
    }

    /// Number of columns past the third.
    pub fn extra_columns(&self) -> usize {
        self.rest.as_deref().map_or(0, |r| r.split('\t').count())
    }

    /// Return a copy with one more column appended to `rest`.
    pub fn with_appended(&self, column: &str) -> Region {
        let rest = match self.rest.as_deref() {
            Some(r) => format!("{}\t{}", r, column),
            None => column.to_string(),
        };
        Region {
            chr: self.chr.clone(),
            start: self.start,
            end: self.end,
            rest: Some(rest),
        }
    }

    ///
    /// Parse one tab-separated line into a region.
    ///
    pub fn from_bed_line(line: &str) -> RegionSetResult<Region> {
        let mut parts = line.splitn(4, '\t');

        let chr = parts
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RegionSetError::RegionParseError(line.to_string()))?;
        let start = parts
            .next()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| {
                RegionSetError::RegionParseError(format!(
                    "Error in parsing start position: {}",
                    line
                ))
            })?;
        let end = parts
            .next()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| {
                RegionSetError::RegionParseError(format!("Error in parsing end position: {}", line))
            })?;

        if end < start {
            return Err(RegionSetError::RegionParseError(format!(
                "End before start: {}",
                line
            )));
        }

        Ok(Region {
            chr: chr.to_string(),
            start,
            end,
            rest: parts.next().map(|s| s.to_string()).filter(|s| !s.is_empty()),
        })
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_bed6_line() {
        let r = Region::from_bed_line("chr1\t100\t110\tsite:2\t0\t-").unwrap();
        assert_eq!(r.chr, "chr1");
        assert_eq!(r.start, 100);
        assert_eq!(r.end, 110);
        assert_eq!(r.column(4), Some("site:2"));
        assert_eq!(r.column(6), Some("-"));
        assert_eq!(r.column(7), None);
        assert_eq!(r.extra_columns(), 3);
    }

    #[rstest]
    #[case("chr1\tabc\t10")]
    #[case("chr1\t10")]
    #[case("chr1\t20\t10")]
    #[case("")]
    fn test_parse_bad_line(#[case] line: &str) {
        assert!(Region::from_bed_line(line).is_err());
    }

    #[rstest]
    fn test_append_column() {
        let r = Region::from_bed_line("chr1\t1\t5").unwrap();
        let r = r.with_appended("peak_0").with_appended(".");
        assert_eq!(r.as_string(), "chr1\t1\t5\tpeak_0\t.");
    }
}
