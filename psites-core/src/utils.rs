use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{RegionSetError, RegionSetResult};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> RegionSetResult<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)
        .map_err(|e| RegionSetError::FileReadError(format!("{}: {}", path.display(), e)))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Derive a sample id from a peak file path.
///
/// The id is the leading token of the file name, cut at the first `.` and
/// then at the first `_`: `S1_rep2.peaks.bed.gz` gives `S1`.
///
pub fn sample_id_from_path(path: &Path) -> RegionSetResult<String> {
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| RegionSetError::InvalidSampleName(path.display().to_string()))?;

    let id = file_name
        .split('.')
        .next()
        .and_then(|s| s.split('_').next())
        .unwrap_or_default();

    if id.is_empty() {
        return Err(RegionSetError::InvalidSampleName(file_name.to_string()));
    }

    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("data/S1_rep2.peaks.bed.gz", "S1")]
    #[case("S2.bed", "S2")]
    #[case("/tmp/PA12_pos.classified.bed", "PA12")]
    #[case("plain", "plain")]
    fn test_sample_id_from_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(sample_id_from_path(Path::new(path)).unwrap(), expected);
    }

    #[rstest]
    #[case(".hidden.bed")]
    #[case("_S1.bed")]
    fn test_sample_id_needs_leading_token(#[case] path: &str) {
        assert!(sample_id_from_path(Path::new(path)).is_err());
    }

    #[rstest]
    fn test_reader_missing_file() {
        let result = get_dynamic_reader(Path::new("no/such/file.bed"));
        assert!(matches!(result, Err(RegionSetError::FileReadError(_))));
    }
}
