use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{RegionSetError, RegionSetResult};
use crate::models::Region;
use crate::utils::get_dynamic_reader;

///
/// RegionSet struct, the in-memory form of one BED-like file.
///
#[derive(Clone, Debug, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub header: Option<String>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for RegionSet {
    type Error = RegionSetError;

    ///
    /// Create a new [RegionSet] from a bed file (plain or gzipped).
    ///
    /// A file without a single record is rejected; use [RegionSet::from_reader]
    /// for sources that may legitimately be empty.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> RegionSetResult<Self> {
        if !value.is_file() {
            return Err(RegionSetError::FileReadError(value.display().to_string()));
        }

        let reader = get_dynamic_reader(value)?;
        let mut rs = RegionSet::from_reader(reader)?;

        if rs.is_empty() {
            return Err(RegionSetError::EmptyRegionSet(value.display().to_string()));
        }
        rs.path = Some(value.to_owned());

        Ok(rs)
    }
}

impl TryFrom<&str> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: &str) -> RegionSetResult<Self> {
        RegionSet::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for RegionSet {
    type Error = RegionSetError;

    fn try_from(value: PathBuf) -> RegionSetResult<Self> {
        RegionSet::try_from(value.as_path())
    }
}

impl From<Vec<Region>> for RegionSet {
    fn from(regions: Vec<Region>) -> Self {
        RegionSet {
            regions,
            header: None,
            path: None,
        }
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

impl RegionSet {
    ///
    /// Read records from any buffered reader, keeping input order.
    ///
    /// `track`, `browser` and `#` lines are collected into the header, as is a
    /// first line whose second and third columns are both not numbers (a
    /// column-name row).
    /// Blank lines are skipped.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> RegionSetResult<Self> {
        let mut regions: Vec<Region> = Vec::new();
        let mut header: String = String::new();
        let mut first_line: bool = true;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');

            if line.is_empty() {
                continue;
            }

            if line.starts_with("browser") | line.starts_with("track") | line.starts_with('#') {
                header.push_str(line);
                first_line = false;
                continue;
            }

            // Handling column headers like `chr start end etc` without #
            if first_line {
                first_line = false;
                let mut columns = line.split('\t').skip(1);
                let is_name = |c: Option<&str>| c.is_some_and(|s| s.parse::<u32>().is_err());
                if is_name(columns.next()) && is_name(columns.next()) {
                    header.push_str(line);
                    continue;
                }
            }

            regions.push(Region::from_bed_line(line)?);
        }

        Ok(RegionSet {
            regions,
            header: match header.is_empty() {
                true => None,
                false => Some(header),
            },
            path: None,
        })
    }

    ///
    /// Save a regionset to disk as bed file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    pub fn to_bed<T: AsRef<Path>>(&self, path: T) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_bed(&mut writer)?;
        writer.flush()
    }

    /// Write every record as one tab-separated line.
    pub fn write_bed<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for region in &self.regions {
            writeln!(writer, "{}", region.as_string())?;
        }
        Ok(())
    }

    ///
    /// Sort regions by chromosome, start and end, in place.
    ///
    pub fn sort(&mut self) {
        self.regions.sort_by(|a, b| {
            a.chr
                .cmp(&b.chr)
                .then_with(|| a.start.cmp(&b.start))
                .then_with(|| a.end.cmp(&b.end))
        });
    }

    ///
    /// Is regionSet empty?
    ///
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    ///
    /// Get number of regions in RegionSet
    ///
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }
}

impl Display for RegionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionSet with {} regions.", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const PEAKS: &str = "track name=peaks\nchr2\t50\t60\tb:2\t0\t-\nchr1\t100\t110\ta:1\t0\t+\n";

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[rstest]
    fn test_open_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "S1.peaks.bed", PEAKS);

        let rs = RegionSet::try_from(path.as_path()).unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.header.as_deref(), Some("track name=peaks"));
        assert_eq!(rs.path.unwrap(), path);
        // input order is kept
        assert_eq!(rs.regions[0].chr, "chr2");
    }

    #[rstest]
    fn test_open_bed_gz() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.bed.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(PEAKS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let rs = RegionSet::try_from(path.to_str().unwrap()).unwrap();
        assert_eq!(rs.len(), 2);
    }

    #[rstest]
    fn test_column_header_is_skipped() {
        let rs = RegionSet::from_reader("chrom\tstart\tend\nchr1\t1\t2\n".as_bytes()).unwrap();
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.header.as_deref(), Some("chrom\tstart\tend"));
    }

    #[rstest]
    #[case("chr1\tabc\t10\nchr1\t1\t2\n")]
    #[case("chr1\t1\tabc\nchr1\t1\t2\n")]
    fn test_bad_first_record_is_not_a_header(#[case] content: &str) {
        let result = RegionSet::from_reader(content.as_bytes());
        assert!(matches!(result, Err(RegionSetError::RegionParseError(_))));
    }

    #[rstest]
    fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "empty.bed", "");
        let result = RegionSet::try_from(path.as_path());
        assert!(matches!(result, Err(RegionSetError::EmptyRegionSet(_))));
    }

    #[rstest]
    fn test_missing_file() {
        let result = RegionSet::try_from("does/not/exist.bed");
        assert!(matches!(result, Err(RegionSetError::FileReadError(_))));
    }

    #[rstest]
    fn test_save_bed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "in.bed", PEAKS);
        let mut rs = RegionSet::try_from(path.as_path()).unwrap();
        rs.sort();

        let out = dir.path().join("nested/out.bed");
        rs.to_bed(&out).unwrap();

        let back = RegionSet::try_from(out.as_path()).unwrap();
        assert_eq!(back.regions, rs.regions);
        assert_eq!(back.regions[0].chr, "chr1");
    }

    #[rstest]
    fn test_sort() {
        let mut rs = RegionSet::from_reader("chr1\t5\t9\nchr1\t5\t7\nchr1\t1\t2\n".as_bytes()).unwrap();
        rs.sort();
        let starts_ends: Vec<(u32, u32)> = rs.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(starts_ends, vec![(1, 2), (5, 7), (5, 9)]);
    }
}
