/// pairsort-core: Interactive partial-order ranking engine.
///
/// Sort a list using only the pairwise judgments a human has made so far. When
/// the judgments are not enough, the sort stops and names the one question to
/// ask next. Record the answer, call again, repeat until the order is complete.
/// The crate does no IO and keeps no state between calls: the caller owns the judgments.
///
/// Items are identified by caller-provided `i64` IDs.
///
/// # Quick start
///
/// ```rust
/// use pairsort_core::{PreferenceGraph, RankingEngine};
///
/// let items = vec![100, 200, 300];
/// let mut graph = PreferenceGraph::new();
/// let engine = RankingEngine::default();
///
/// loop {
///     let result = engine.rank_seeded(&items, &graph, 7).unwrap();
///     match result.unresolved_pair {
///         // Ask the human. Here: the larger ID always wins.
///         Some((a, b)) => graph.prefer(a.max(b), a.min(b)),
///         None => {
///             assert_eq!(result.order, vec![100, 200, 300]);
///             break;
///         }
///     }
/// }
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod graph;
pub mod insertion;
pub mod list;
pub mod oracle;
pub mod quicksort;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export primary public API at crate root.
pub use engine::{EngineConfig, RankingEngine};
pub use error::RankError;
pub use graph::PreferenceGraph;
pub use insertion::insertion_sort;
pub use list::{ListOrder, RankingList};
pub use oracle::{Oracle, PreferenceOracle};
pub use quicksort::{sample_size, QuickSort};
pub use types::{ComparisonOutcome, ItemId, Pair, PreferenceFact, Relation, SortResult};
