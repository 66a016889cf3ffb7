/// Ranges shorter than this are insertion-sorted instead of partitioned.
///
/// Insertion sort asks about adjacent neighbours only, so on short ranges it
/// tends to request fewer judgments than median-of-sample partitioning, whose
/// pivot must be compared against every element of the range.
pub const DEFAULT_INSERTION_THRESHOLD: usize = 12;

/// Smallest usable insertion threshold. Zero would leave no range for which
/// the sort is defined.
pub const MIN_INSERTION_THRESHOLD: usize = 1;
