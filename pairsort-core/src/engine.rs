/// Ranking engine orchestrator.
///
/// One call to `rank()` is one ranking attempt: build the oracle from the
/// caller's graph, sort a working copy of the items, and report either the
/// finished order or the question that has to be answered next. The engine
/// keeps no state between attempts; all continuity lives in the caller's
/// `PreferenceGraph`.
///
/// Items are identified by caller-provided `i64` IDs.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::constants::DEFAULT_INSERTION_THRESHOLD;
use crate::error::RankError;
use crate::graph::PreferenceGraph;
use crate::oracle::{Oracle, PreferenceOracle};
use crate::quicksort::QuickSort;
use crate::types::{ItemId, SortResult};

/// Configuration for the ranking engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Ranges shorter than this are insertion-sorted. Must be at least 1.
    pub insertion_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { insertion_threshold: DEFAULT_INSERTION_THRESHOLD }
    }
}

/// Stateless between calls; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    sorter: QuickSort,
}

impl RankingEngine {
    /// Validate `config` and build an engine. Invalid configuration is
    /// rejected here, before any attempt runs.
    pub fn new(config: EngineConfig) -> Result<Self, RankError> {
        let sorter = QuickSort::new(config.insertion_threshold)?;
        Ok(RankingEngine { sorter })
    }

    /// Run one ranking attempt over `items` against `graph`.
    ///
    /// `items` should already exclude anything the caller is ignoring. The
    /// returned order is ascending: least preferred first.
    pub fn rank(
        &self,
        items: &[ItemId],
        graph: &PreferenceGraph,
        rng: &mut impl Rng,
    ) -> Result<SortResult, RankError> {
        let oracle = PreferenceOracle::new(items, graph)?;
        debug!(items = items.len(), facts = graph.len(), "ranking attempt");
        Ok(self.rank_with_oracle(items, &oracle, rng))
    }

    /// `rank()` with a pivot RNG seeded from `seed`: same items, graph and
    /// seed give the same result every time.
    pub fn rank_seeded(
        &self,
        items: &[ItemId],
        graph: &PreferenceGraph,
        seed: u64,
    ) -> Result<SortResult, RankError> {
        self.rank(items, graph, &mut StdRng::seed_from_u64(seed))
    }

    /// Run one attempt against any oracle. No duplicate check is made on
    /// `items`; `rank()` gets that from `PreferenceOracle::new`.
    pub fn rank_with_oracle<O: Oracle + ?Sized>(
        &self,
        items: &[ItemId],
        oracle: &O,
        rng: &mut impl Rng,
    ) -> SortResult {
        let mut order = items.to_vec();
        match self.sorter.sort(&mut order, oracle, rng) {
            Ok(()) => {
                debug!(items = order.len(), "ranking complete");
                SortResult::complete(order)
            }
            Err(pair) => {
                debug!(a = pair.0, b = pair.1, "ranking blocked on unresolved pair");
                SortResult::blocked(order, pair)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ById;
    use crate::types::PreferenceFact;

    const A: ItemId = 1;
    const B: ItemId = 2;
    const C: ItemId = 3;
    const D: ItemId = 4;

    fn graph(facts: &[(ItemId, ItemId)]) -> PreferenceGraph {
        PreferenceGraph::from_facts(facts.iter().map(|&(g, l)| PreferenceFact::new(g, l)))
    }

    fn same_pair(pair: (ItemId, ItemId), x: ItemId, y: ItemId) -> bool {
        pair == (x, y) || pair == (y, x)
    }

    #[test]
    fn test_no_facts_asks_about_two_items() {
        let engine = RankingEngine::default();
        let result = engine.rank_seeded(&[A, B, C], &PreferenceGraph::new(), 1).unwrap();
        assert!(!result.completed);
        let (x, y) = result.unresolved_pair.unwrap();
        assert_ne!(x, y);
        assert!([A, B, C].contains(&x) && [A, B, C].contains(&y));
    }

    #[test]
    fn test_single_fact_orders_two_items() {
        let engine = RankingEngine::default();
        let result = engine.rank_seeded(&[A, B], &graph(&[(A, B)]), 1).unwrap();
        assert_eq!(result, SortResult::complete(vec![B, A]));
    }

    #[test]
    fn test_transitive_chain() {
        let engine = RankingEngine::default();
        let result = engine.rank_seeded(&[A, B, C], &graph(&[(A, B), (B, C)]), 1).unwrap();
        assert!(result.completed);
        assert_eq!(result.order, vec![C, B, A]);
    }

    #[test]
    fn test_two_chains_ask_across() {
        let engine = RankingEngine::default();
        let result = engine.rank_seeded(&[A, B, C, D], &graph(&[(A, B), (C, D)]), 1).unwrap();
        assert!(!result.completed);
        let (x, y) = result.unresolved_pair.unwrap();
        let left = [A, B];
        let right = [C, D];
        assert!(
            (left.contains(&x) && right.contains(&y)) || (left.contains(&y) && right.contains(&x)),
            "unexpected pair ({x}, {y})"
        );
    }

    #[test]
    fn test_single_item_asks_nothing() {
        let engine = RankingEngine::default();
        let oracle = ById::total();
        let result = engine.rank_with_oracle(&[A], &oracle, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, SortResult::complete(vec![A]));
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_empty_input_is_complete() {
        let engine = RankingEngine::default();
        let result = engine.rank_seeded(&[], &PreferenceGraph::new(), 0).unwrap();
        assert_eq!(result, SortResult::complete(Vec::new()));
    }

    #[test]
    fn test_default_engine_uses_default_config() {
        let items: Vec<ItemId> = (0..40).rev().collect();
        let run = |engine: &RankingEngine| {
            let oracle = ById::total();
            let result = engine.rank_with_oracle(&items, &oracle, &mut StdRng::seed_from_u64(9));
            (result, oracle.calls.get())
        };
        let configured = RankingEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(run(&RankingEngine::default()), run(&configured));
    }

    #[test]
    fn test_rejects_invalid_threshold() {
        let err = RankingEngine::new(EngineConfig { insertion_threshold: 0 }).unwrap_err();
        assert_eq!(err, RankError::InvalidInsertionThreshold(0));
    }

    #[test]
    fn test_rejects_contradictory_graph() {
        let engine = RankingEngine::default();
        let err = engine.rank_seeded(&[A, B, C], &graph(&[(A, B), (B, C), (C, A)]), 0).unwrap_err();
        assert!(matches!(err, RankError::Inconsistent { .. }));
    }

    #[test]
    fn test_rejects_duplicate_items() {
        let engine = RankingEngine::default();
        let err = engine.rank_seeded(&[A, B, A], &PreferenceGraph::new(), 0).unwrap_err();
        assert_eq!(err, RankError::DuplicateItem(A));
    }

    #[test]
    fn test_answering_the_question_moves_on() {
        let engine = RankingEngine::new(EngineConfig { insertion_threshold: 2 }).unwrap();
        let items: Vec<ItemId> = (1..=8).collect();
        let mut facts = graph(&[]);

        let first = engine.rank_seeded(&items, &facts, 11).unwrap();
        let (x, y) = first.unresolved_pair.unwrap();
        facts.prefer(x.max(y), x.min(y));

        let second = engine.rank_seeded(&items, &facts, 11).unwrap();
        assert!(second.completed || !same_pair(second.unresolved_pair.unwrap(), x, y));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RankingEngine>();
    }
}
