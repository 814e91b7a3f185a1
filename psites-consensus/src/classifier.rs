use std::collections::BTreeSet;

use psites_core::models::ClassifiedPeak;

use crate::errors::{ConsensusError, ConsensusResult};

///
/// Keep the peaks whose classification code is accepted, in their original order.
///
/// A peak whose name does not end in an integer code is an error naming that
/// peak; nothing is returned in that case.
///
pub fn classify(
    peaks: &[ClassifiedPeak],
    accepted: &BTreeSet<i64>,
) -> ConsensusResult<Vec<ClassifiedPeak>> {
    let mut kept = Vec::with_capacity(peaks.len());

    for peak in peaks {
        let code = peak
            .class_code()
            .map_err(|_| ConsensusError::InvalidClassCode(peak.name.clone()))?;
        if accepted.contains(&code) {
            kept.push(peak.clone());
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use psites_core::models::Strand;
    use rstest::*;

    fn peak(start: u32, name: &str) -> ClassifiedPeak {
        ClassifiedPeak {
            chr: "chr1".to_string(),
            start,
            end: start + 10,
            name: name.to_string(),
            score: "0".to_string(),
            strand: Strand::Forward,
        }
    }

    #[rstest]
    #[case(&[1], vec![0, 30])]
    #[case(&[1, 2], vec![0, 10, 30])]
    #[case(&[4], vec![])]
    fn test_classify(#[case] accepted: &[i64], #[case] starts: Vec<u32>) {
        let peaks = vec![peak(0, "a:1"), peak(10, "b:2"), peak(20, "c:3"), peak(30, "d:1")];
        let accepted: BTreeSet<i64> = accepted.iter().copied().collect();

        let kept = classify(&peaks, &accepted).unwrap();
        assert_eq!(kept.iter().map(|p| p.start).collect::<Vec<_>>(), starts);
    }

    #[rstest]
    fn test_classify_unknown_code_is_dropped() {
        let peaks = vec![peak(0, "a:1"), peak(10, "far:300"), peak(20, "x:-1")];
        let kept = classify(&peaks, &BTreeSet::from([1, 2, 3, 4])).unwrap();
        assert_eq!(kept, vec![peak(0, "a:1")]);
    }

    #[rstest]
    fn test_classify_bad_code() {
        let peaks = vec![peak(0, "a:1"), peak(10, "site_9:x")];
        let err = classify(&peaks, &BTreeSet::from([1])).unwrap_err();

        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("site_9:x"));
    }
}
