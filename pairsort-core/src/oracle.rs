/// Comparison oracle: answers "is A known to outrank B?" for one ranking attempt.
///
/// The sort never looks at the graph directly. It only asks an `Oracle`, which
/// may say "not known yet"; that answer is what stops an attempt.
use crate::error::RankError;
use crate::graph::PreferenceGraph;
use crate::types::{ComparisonOutcome, IdMap, ItemId, Relation};

/// Pairwise comparison capability used by the sort.
///
/// Implementations must be consistent (`compare(a, b) == Greater` implies
/// `compare(b, a) == Lesser`) and must not change their answers during one
/// attempt. `compare(a, a)` must succeed with `Equal`.
pub trait Oracle {
    fn compare(&self, a: ItemId, b: ItemId) -> ComparisonOutcome;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn compare(&self, a: ItemId, b: ItemId) -> ComparisonOutcome {
        (**self).compare(a, b)
    }
}

/// Oracle over a `PreferenceGraph` snapshot, restricted to the active items.
///
/// Reachability between every pair of active items is computed once, up front,
/// so each comparison is a table lookup. Paths may run through items outside
/// the active set: ignoring an item does not forget what it implied.
#[derive(Debug, Clone)]
pub struct PreferenceOracle {
    id_map: IdMap,
    /// reach[i * n + j] == true iff active item i is proven greater than item j.
    reach: Vec<bool>,
}

impl PreferenceOracle {
    /// Build the oracle for `items`. Fails on duplicate items or when the
    /// graph contains a cycle anywhere.
    pub fn new(items: &[ItemId], graph: &PreferenceGraph) -> Result<Self, RankError> {
        let id_map = IdMap::from_ids(items)?;

        if let Some(cycle) = graph.find_cycle() {
            return Err(RankError::Inconsistent { cycle });
        }

        let n = id_map.len();
        let mut reach = vec![false; n * n];
        for (i, &id) in items.iter().enumerate() {
            for lesser in graph.descendants(id) {
                if let Some(j) = id_map.get(lesser) {
                    reach[i * n + j] = true;
                }
            }
        }

        Ok(PreferenceOracle { id_map, reach })
    }

    fn proves(&self, i: usize, j: usize) -> bool {
        self.reach[i * self.id_map.len() + j]
    }

    /// Number of active item pairs the graph cannot order yet.
    ///
    /// An upper bound on the questions still needed to finish the ranking.
    pub fn unresolved_pair_count(&self) -> usize {
        let n = self.id_map.len();
        let mut count = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                if !self.proves(i, j) && !self.proves(j, i) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl Oracle for PreferenceOracle {
    fn compare(&self, a: ItemId, b: ItemId) -> ComparisonOutcome {
        if a == b {
            return ComparisonOutcome::known(Relation::Equal);
        }

        match (self.id_map.get(a), self.id_map.get(b)) {
            (Some(i), Some(j)) if self.proves(i, j) => ComparisonOutcome::known(Relation::Greater),
            (Some(i), Some(j)) if self.proves(j, i) => ComparisonOutcome::known(Relation::Lesser),
            _ => ComparisonOutcome::unknown(),
        }
    }
}
