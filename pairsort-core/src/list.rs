/// A ranking list: a fixed set of items, which of them are ignored, and the
/// judgments recorded so far.
///
/// This is the caller side of the ranking protocol packaged up: attempt an
/// order, show the pending question, record the answer, attempt again.
/// Recording validates each judgment so the graph stays acyclic.
use rand::Rng;
use tracing::{debug, warn};

use crate::engine::RankingEngine;
use crate::error::RankError;
use crate::graph::PreferenceGraph;
use crate::oracle::PreferenceOracle;
use crate::types::{IdMap, ItemId, Pair};

/// Result of `RankingList::attempt_order()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOrder {
    pub completed: bool,
    /// Active items, least preferred first. Partial when not `completed`.
    pub sorted: Vec<ItemId>,
    /// Ignored items in list order. Not ranked.
    pub ignored: Vec<ItemId>,
    /// The question to ask next. `None` iff `completed`.
    pub choice: Option<Pair>,
    /// Upper bound on the questions still needed.
    pub choices_remaining: usize,
}

#[derive(Debug, Clone)]
pub struct RankingList {
    index: IdMap,
    ignored: Vec<bool>,
    graph: PreferenceGraph,
}

impl RankingList {
    pub fn new(items: &[ItemId]) -> Result<Self, RankError> {
        Ok(RankingList {
            index: IdMap::from_ids(items)?,
            ignored: vec![false; items.len()],
            graph: PreferenceGraph::new(),
        })
    }

    /// All items, ignored or not, in list order.
    pub fn items(&self) -> &[ItemId] {
        self.index.ids()
    }

    pub fn graph(&self) -> &PreferenceGraph {
        &self.graph
    }

    pub fn active_items(&self) -> Vec<ItemId> {
        self.items_where(false)
    }

    pub fn ignored_items(&self) -> Vec<ItemId> {
        self.items_where(true)
    }

    fn items_where(&self, ignored: bool) -> Vec<ItemId> {
        self.index
            .ids()
            .iter()
            .zip(&self.ignored)
            .filter(|&(_, &flag)| flag == ignored)
            .map(|(&id, _)| id)
            .collect()
    }

    fn position(&self, id: ItemId) -> Result<usize, RankError> {
        self.index.get(id).ok_or(RankError::UnknownItem(id))
    }

    pub fn is_ignored(&self, id: ItemId) -> Result<bool, RankError> {
        Ok(self.ignored[self.position(id)?])
    }

    /// Record that `greater` is preferred over `lesser`.
    ///
    /// Returns `Ok(false)` when the graph already proves it (nothing is added),
    /// `Ok(true)` when a new fact was appended. A judgment that reverses what
    /// the graph proves is refused with `RankError::Contradiction`.
    pub fn record_preference(&mut self, greater: ItemId, lesser: ItemId) -> Result<bool, RankError> {
        self.position(greater)?;
        self.position(lesser)?;
        if greater == lesser {
            return Err(RankError::SelfPreference(greater));
        }

        if self.graph.reaches(lesser, greater) {
            warn!(greater, lesser, "refusing preference that contradicts recorded facts");
            return Err(RankError::Contradiction { greater, lesser });
        }
        if self.graph.reaches(greater, lesser) {
            debug!(greater, lesser, "preference already implied");
            return Ok(false);
        }

        self.graph.prefer(greater, lesser);
        Ok(true)
    }

    /// Exclude an item from future attempts. Its facts stay in the graph.
    pub fn ignore(&mut self, id: ItemId) -> Result<(), RankError> {
        let pos = self.position(id)?;
        self.ignored[pos] = true;
        Ok(())
    }

    /// Put an ignored item back into the ranking.
    pub fn restore(&mut self, id: ItemId) -> Result<(), RankError> {
        let pos = self.position(id)?;
        self.ignored[pos] = false;
        Ok(())
    }

    /// Run one ranking attempt over the active items.
    pub fn attempt_order(&self, engine: &RankingEngine, rng: &mut impl Rng) -> Result<ListOrder, RankError> {
        let active = self.active_items();
        let oracle = PreferenceOracle::new(&active, &self.graph)?;
        let result = engine.rank_with_oracle(&active, &oracle, rng);

        Ok(ListOrder {
            completed: result.completed,
            sorted: result.order,
            ignored: self.ignored_items(),
            choice: result.unresolved_pair,
            choices_remaining: oracle.unresolved_pair_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_record_validates_items() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        assert_eq!(list.record_preference(1, 9), Err(RankError::UnknownItem(9)));
        assert_eq!(list.record_preference(2, 2), Err(RankError::SelfPreference(2)));
        assert!(list.graph().is_empty());
    }

    #[test]
    fn test_record_refuses_contradiction() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        assert_eq!(list.record_preference(1, 2), Ok(true));
        assert_eq!(list.record_preference(2, 3), Ok(true));
        assert_eq!(
            list.record_preference(3, 1),
            Err(RankError::Contradiction { greater: 3, lesser: 1 })
        );
        assert_eq!(list.graph().len(), 2);
    }

    #[test]
    fn test_record_skips_implied_fact() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        list.record_preference(1, 2).unwrap();
        list.record_preference(2, 3).unwrap();
        assert_eq!(list.record_preference(1, 3), Ok(false));
        assert_eq!(list.graph().len(), 2);
    }

    #[test]
    fn test_ignore_and_restore() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        list.ignore(2).unwrap();
        assert_eq!(list.active_items(), vec![1, 3]);
        assert_eq!(list.ignored_items(), vec![2]);
        assert_eq!(list.is_ignored(2), Ok(true));

        list.restore(2).unwrap();
        assert_eq!(list.active_items(), vec![1, 2, 3]);
        assert_eq!(list.ignore(7), Err(RankError::UnknownItem(7)));
    }

    #[test]
    fn test_attempt_order_excludes_ignored_items() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        list.record_preference(3, 1).unwrap();
        list.ignore(2).unwrap();

        let engine = RankingEngine::default();
        let order = list.attempt_order(&engine, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(order.completed);
        assert_eq!(order.sorted, vec![1, 3]);
        assert_eq!(order.ignored, vec![2]);
        assert_eq!(order.choice, None);
        assert_eq!(order.choices_remaining, 0);
    }

    #[test]
    fn test_ignored_item_still_links_its_neighbours() {
        let mut list = RankingList::new(&[1, 2, 3]).unwrap();
        list.record_preference(3, 2).unwrap();
        list.record_preference(2, 1).unwrap();
        list.ignore(2).unwrap();

        let order = list
            .attempt_order(&RankingEngine::default(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(order.completed);
        assert_eq!(order.sorted, vec![1, 3]);
    }

    #[test]
    fn test_attempt_order_reports_choice() {
        let list = RankingList::new(&[1, 2]).unwrap();
        let order = list
            .attempt_order(&RankingEngine::default(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(!order.completed);
        assert!(matches!(order.choice, Some((1, 2)) | Some((2, 1))));
        assert_eq!(order.choices_remaining, 1);
    }
}
