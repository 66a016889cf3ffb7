/// Quicksort over a comparison relation that may answer "not known yet".
///
/// Median-of-sample pivoting with a random sample, three-way partitioning
/// (elements equal to the pivot are gathered into a middle band), recursion
/// into the shorter side and iteration over the longer one. Short ranges go to
/// `insertion_sort`.
///
/// Every step returns `Result<(), Pair>`. An `Err` carries the comparison that
/// could not be answered and unwinds the whole sort; nothing is retried.
use rand::Rng;
use tracing::trace;

use crate::constants::{DEFAULT_INSERTION_THRESHOLD, MIN_INSERTION_THRESHOLD};
use crate::error::RankError;
use crate::insertion::insertion_sort;
use crate::oracle::Oracle;
use crate::types::{ItemId, Pair, Relation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSort {
    insertion_threshold: usize,
}

impl Default for QuickSort {
    fn default() -> Self {
        QuickSort { insertion_threshold: DEFAULT_INSERTION_THRESHOLD }
    }
}

impl QuickSort {
    pub fn new(insertion_threshold: usize) -> Result<Self, RankError> {
        if insertion_threshold < MIN_INSERTION_THRESHOLD {
            return Err(RankError::InvalidInsertionThreshold(insertion_threshold));
        }
        Ok(QuickSort { insertion_threshold })
    }

    /// Sort `entries` ascending (least preferred first) in place.
    ///
    /// On `Err` the slice holds the arrangement reached when the unanswerable
    /// comparison came up; it is always a permutation of the input.
    pub fn sort<O: Oracle + ?Sized>(
        &self,
        entries: &mut [ItemId],
        oracle: &O,
        rng: &mut impl Rng,
    ) -> Result<(), Pair> {
        self.sort_range(entries, oracle, rng, 0)
    }

    fn sort_range<O: Oracle + ?Sized>(
        &self,
        mut entries: &mut [ItemId],
        oracle: &O,
        rng: &mut impl Rng,
        depth: usize,
    ) -> Result<(), Pair> {
        while entries.len() > 1 {
            if entries.len() < self.insertion_threshold {
                return insertion_sort(entries, oracle);
            }

            let pivot = select_pivot(entries, oracle, rng)?;
            let bounds = partition(entries, pivot, oracle)?;
            trace!(
                depth,
                len = entries.len(),
                pivot,
                lower = bounds.lower_end,
                upper = entries.len() - bounds.upper_start,
                "partitioned"
            );

            // Recurse over the shorter side, loop on the longer one.
            let range = std::mem::take(&mut entries);
            let (lower, rest) = range.split_at_mut(bounds.lower_end);
            let upper = &mut rest[bounds.upper_start - bounds.lower_end..];
            if lower.len() < upper.len() {
                self.sort_range(lower, oracle, rng, depth + 1)?;
                entries = upper;
            } else {
                self.sort_range(upper, oracle, rng, depth + 1)?;
                entries = lower;
            }
        }
        Ok(())
    }
}

/// Odd pivot sample size for a range of `length` items: `2 * floor(log10(length)) + 1`,
/// capped at `length`. Zero only for an empty range.
pub fn sample_size(length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    (2 * length.ilog10() as usize + 1).min(length)
}

/// Move a random sample to the front of `entries`, insertion-sort it and
/// return its median as the pivot.
fn select_pivot<O: Oracle + ?Sized>(
    entries: &mut [ItemId],
    oracle: &O,
    rng: &mut impl Rng,
) -> Result<ItemId, Pair> {
    let size = sample_size(entries.len());

    // Sample without replacement: a partial Fisher-Yates shuffle.
    for slot in 0..size {
        let pick = rng.random_range(slot..entries.len());
        entries.swap(slot, pick);
    }

    insertion_sort(&mut entries[..size], oracle)?;
    Ok(entries[size / 2])
}

/// Where a partition left the two unsorted sides.
///
/// `entries[..lower_end]` <= pivot, `entries[upper_start..]` >= pivot, and
/// everything in between equals the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    lower_end: usize,
    upper_start: usize,
}

/// Cursor state for one partition pass.
///
/// `left_band` and `right_band` mark how far the runs of pivot-equal elements
/// parked at either edge extend; they are swapped into the middle at the end.
/// Cursors are signed because `right` can step one below the range start.
struct Partition {
    left: isize,
    right: isize,
    left_band: isize,
    right_band: isize,
}

/// How `pivot` relates to `entry`, or the pair that could not be compared.
fn against<O: Oracle + ?Sized>(oracle: &O, pivot: ItemId, entry: ItemId) -> Result<Relation, Pair> {
    oracle.compare(pivot, entry).relation.ok_or((entry, pivot))
}

fn partition<O: Oracle + ?Sized>(
    entries: &mut [ItemId],
    pivot: ItemId,
    oracle: &O,
) -> Result<Bounds, Pair> {
    let first = 0isize;
    let last = entries.len() as isize - 1;
    let mut p = Partition { left: first, right: last, left_band: first, right_band: last };

    loop {
        // The pivot itself, then every element swapped past a cursor, stops
        // the scans, so neither cursor leaves the range.
        while against(oracle, pivot, entries[p.left as usize])? == Relation::Greater {
            p.left += 1;
        }
        while against(oracle, pivot, entries[p.right as usize])? == Relation::Lesser {
            p.right -= 1;
        }

        // entries[right] <= pivot <= entries[left]
        if p.right <= p.left {
            break;
        }

        entries.swap(p.left as usize, p.right as usize);
        p.park_equal(entries, pivot, oracle)?;
        p.left += 1;
        p.right -= 1;
    }

    if p.left == p.right {
        p.left += 1;
        p.right -= 1;
    }

    p.restore_bands(entries, first, last);

    Ok(Bounds {
        lower_end: (p.right + 1) as usize,
        upper_start: p.left as usize,
    })
}

impl Partition {
    /// Move pivot-equal elements at the cursors into the edge bands.
    fn park_equal<O: Oracle + ?Sized>(
        &mut self,
        entries: &mut [ItemId],
        pivot: ItemId,
        oracle: &O,
    ) -> Result<(), Pair> {
        if against(oracle, pivot, entries[self.left as usize])? == Relation::Equal {
            entries.swap(self.left_band as usize, self.left as usize);
            self.left_band += 1;
        }
        if against(oracle, pivot, entries[self.right as usize])? == Relation::Equal {
            entries.swap(self.right as usize, self.right_band as usize);
            self.right_band -= 1;
        }
        Ok(())
    }

    /// Swap the edge bands into the gap between the crossed cursors.
    fn restore_bands(&mut self, entries: &mut [ItemId], mut first: isize, mut last: isize) {
        while first < self.left_band {
            entries.swap(first as usize, self.right as usize);
            first += 1;
            self.right -= 1;
        }
        while self.right_band < last {
            entries.swap(self.left as usize, last as usize);
            self.left += 1;
            last -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ById;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    fn shuffled(n: i64, seed: u64) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = (0..n).collect();
        items.shuffle(&mut StdRng::seed_from_u64(seed));
        items
    }

    #[test]
    fn test_sample_size() {
        assert_eq!(sample_size(0), 0);
        assert_eq!(sample_size(1), 1);
        assert_eq!(sample_size(9), 1);
        assert_eq!(sample_size(10), 3);
        assert_eq!(sample_size(99), 3);
        assert_eq!(sample_size(100), 5);
        assert_eq!(sample_size(12_345), 9);
        for len in 1..2_000 {
            let size = sample_size(len);
            assert!(size % 2 == 1 && size <= len, "len {len}");
        }
    }

    #[test]
    fn test_rejects_zero_threshold() {
        assert_eq!(QuickSort::new(0), Err(RankError::InvalidInsertionThreshold(0)));
        assert!(QuickSort::new(1).is_ok());
    }

    #[test]
    fn test_partition_invariant() {
        for seed in 0..20 {
            let mut entries = shuffled(40, seed);
            let pivot = entries[seed as usize % 40];
            let bounds = partition(&mut entries, pivot, &ById::total()).unwrap();

            assert!(bounds.lower_end < bounds.upper_start);
            assert!(entries[..bounds.lower_end].iter().all(|&e| e < pivot));
            assert!(entries[bounds.upper_start..].iter().all(|&e| e > pivot));
            assert_eq!(&entries[bounds.lower_end..bounds.upper_start], &[pivot]);
        }
    }

    #[test]
    fn test_partition_at_range_edges() {
        let mut low = vec![0, 3, 1, 2];
        let bounds = partition(&mut low, 0, &ById::total()).unwrap();
        assert_eq!(bounds, Bounds { lower_end: 0, upper_start: 1 });
        assert_eq!(low[0], 0);

        let mut high = vec![2, 3, 1, 0];
        let bounds = partition(&mut high, 3, &ById::total()).unwrap();
        assert_eq!(bounds, Bounds { lower_end: 3, upper_start: 4 });
        assert_eq!(high[3], 3);
    }

    #[test]
    fn test_sorts_with_every_threshold() {
        for threshold in [1, 2, 5, 12, 100] {
            let sorter = QuickSort::new(threshold).unwrap();
            for seed in 0..5 {
                let mut entries = shuffled(200, seed);
                let mut rng = StdRng::seed_from_u64(seed);
                sorter.sort(&mut entries, &ById::total(), &mut rng).unwrap();
                assert_eq!(entries, (0..200).collect::<Vec<_>>(), "threshold {threshold}");
            }
        }
    }

    #[test]
    fn test_sorts_adversarial_inputs() {
        let sorter = QuickSort::new(2).unwrap();
        let ascending: Vec<ItemId> = (0..500).collect();
        let descending: Vec<ItemId> = (0..500).rev().collect();
        let organ_pipe: Vec<ItemId> = (0..250).map(|i| i * 2).chain((0..250).rev().map(|i| i * 2 + 1)).collect();

        for input in [ascending, descending, organ_pipe] {
            let mut entries = input.clone();
            sorter.sort(&mut entries, &ById::total(), &mut StdRng::seed_from_u64(3)).unwrap();
            assert_eq!(entries, (0..500).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_unknown_pair_aborts_with_permutation_intact() {
        let sorter = QuickSort::new(3).unwrap();
        let oracle = ById::with_unknown(&[(17, 18)]);
        let mut entries = shuffled(60, 9);
        let pair = sorter
            .sort(&mut entries, &oracle, &mut StdRng::seed_from_u64(9))
            .unwrap_err();

        let (a, b) = pair;
        assert!(matches!((a.min(b), a.max(b)), (17, 18)));

        let mut seen = entries.clone();
        seen.sort();
        assert_eq!(seen, (0..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let sorter = QuickSort::default();
        let oracle = ById::with_unknown(&[(40, 41), (3, 90)]);
        let run = |seed| {
            let mut entries = shuffled(100, 1);
            let outcome = sorter.sort(&mut entries, &oracle, &mut StdRng::seed_from_u64(seed));
            (outcome, entries)
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn test_single_element_asks_nothing() {
        let oracle = ById::total();
        let mut entries = vec![7];
        QuickSort::default()
            .sort(&mut entries, &oracle, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(oracle.calls.get(), 0);
    }
}
