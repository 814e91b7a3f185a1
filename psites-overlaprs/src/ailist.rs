use num_traits::{PrimInt, Unsigned};

use super::Overlapper;
use psites_core::models::Interval;

/// Intervals that contain at least this many of their near successors are
/// moved to the next component during decomposition.
const MINIMUM_COVERAGE: usize = 10;

/// An Augmented Interval List for genomic interval overlap queries.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// Intervals are sorted by start and split into components so that long
/// intervals covering many short ones do not degrade the backwards scan.
/// Each component keeps a running maximum of interval ends, which bounds how
/// far back a query has to walk.
///
/// # Examples
///
/// ```
/// use psites_overlaprs::{AIList, Overlapper, Interval};
///
/// let peaks = vec![
///     Interval { start: 100u32, end: 110, val: 0usize },
///     Interval { start: 105, end: 120, val: 1 },
///     Interval { start: 300, end: 310, val: 2 },
/// ];
///
/// let ailist = AIList::build(peaks);
/// let mut hits: Vec<usize> = ailist.find_iter(108, 200).map(|iv| iv.val).collect();
/// hits.sort();
/// assert_eq!(hits, vec![0, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    components: Vec<Component<I, T>>,
}

/// One decomposed sublist: intervals sorted by start plus the running max end.
#[derive(Debug, Clone)]
struct Component<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    max_ends: Vec<I>,
}

impl<I, T> Component<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn new(intervals: Vec<Interval<I, T>>) -> Self {
        let mut max = I::zero();
        let max_ends = intervals
            .iter()
            .map(|iv| {
                max = max.max(iv.end);
                max
            })
            .collect();

        Component {
            intervals,
            max_ends,
        }
    }

    fn query(&self, start: I, end: I) -> impl Iterator<Item = &Interval<I, T>> + '_ {
        // everything at or past this index starts at/after the query end
        let upper = self.intervals.partition_point(|iv| iv.start < end);

        (0..upper)
            .rev()
            .take_while(move |&i| self.max_ends[i] > start)
            .filter(move |&i| self.intervals[i].overlap(start, end))
            .map(move |i| &self.intervals[i])
    }
}

impl<I, T> AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Split sorted `intervals` into the ones kept in this component and the
    /// ones pushed down to the next.
    fn decompose(intervals: Vec<Interval<I, T>>) -> (Vec<Interval<I, T>>, Vec<Interval<I, T>>) {
        let mut kept = Vec::with_capacity(intervals.len());
        let mut pushed = Vec::new();
        let window = MINIMUM_COVERAGE * 2;

        for (index, interval) in intervals.iter().enumerate() {
            let covered = intervals
                .iter()
                .skip(index + 1)
                .take(window - 1)
                .filter(|next| interval.end > next.end)
                .count();

            if covered >= MINIMUM_COVERAGE {
                pushed.push(interval.clone());
            } else {
                kept.push(interval.clone());
            }
        }

        (kept, pushed)
    }

    /// Number of components the list was split into.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl<I, T> Overlapper<I, T> for AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut remaining = intervals;
        remaining.sort_by_key(|iv| iv.start);

        let mut components = Vec::new();
        while !remaining.is_empty() {
            let (kept, pushed) = Self::decompose(remaining);
            components.push(Component::new(kept));
            remaining = pushed;
        }

        AIList { components }
    }

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(
            self.components
                .iter()
                .flat_map(move |component| component.query(start, end)),
        )
    }

    fn len(&self) -> usize {
        self.components.iter().map(|c| c.intervals.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn sorted_vals(list: &AIList<u32, usize>, start: u32, end: u32) -> Vec<usize> {
        let mut vals: Vec<usize> = list.find_iter(start, end).map(|iv| iv.val).collect();
        vals.sort();
        vals
    }

    fn brute_force(intervals: &[(u32, u32)], start: u32, end: u32) -> Vec<usize> {
        intervals
            .iter()
            .enumerate()
            .filter(|(_, (s, e))| *s < end && *e > start)
            .map(|(i, _)| i)
            .collect()
    }

    #[rstest]
    #[case(0, 5, vec![])]
    #[case(9, 12, vec![0])]
    #[case(10, 20, vec![0, 1])]
    #[case(20, 21, vec![])]
    #[case(0, 100, vec![0, 1, 2])]
    fn test_find(#[case] start: u32, #[case] end: u32, #[case] expected: Vec<usize>) {
        let list = AIList::build(vec![
            Interval { start: 5u32, end: 15, val: 0usize },
            Interval { start: 12, end: 20, val: 1 },
            Interval { start: 40, end: 50, val: 2 },
        ]);
        assert_eq!(sorted_vals(&list, start, end), expected);
    }

    #[rstest]
    fn test_empty() {
        let list: AIList<u32, usize> = AIList::build(vec![]);
        assert!(list.is_empty());
        assert_eq!(list.find(0, 10).len(), 0);
    }

    #[rstest]
    fn test_decomposes_long_intervals() {
        // one long interval containing many short ones lands in its own component
        let mut raw = vec![(0u32, 10_000u32)];
        raw.extend((0..50).map(|i| (i * 100 + 1, i * 100 + 50)));
        let list = AIList::build(
            raw.iter()
                .enumerate()
                .map(|(i, (s, e))| Interval { start: *s, end: *e, val: i })
                .collect(),
        );

        assert!(list.component_count() > 1);
        assert_eq!(list.len(), raw.len());

        for (start, end) in [(0, 1), (120, 130), (4_990, 5_020), (9_999, 20_000), (60, 99)] {
            assert_eq!(sorted_vals(&list, start, end), brute_force(&raw, start, end));
        }
    }
}
