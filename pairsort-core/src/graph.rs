/// The caller-owned store of recorded judgments.
///
/// Facts are append-only. The graph itself never refuses a fact; callers that
/// want validation go through `RankingList::record_preference`, and a graph
/// that has become cyclic is rejected when an oracle is built from it.
use std::collections::{BTreeMap, HashSet};

use crate::types::{ItemId, PreferenceFact, Relation};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<PreferenceFact>", into = "Vec<PreferenceFact>")
)]
pub struct PreferenceGraph {
    facts: Vec<PreferenceFact>,
    /// greater -> every item it was directly preferred over.
    edges: BTreeMap<ItemId, Vec<ItemId>>,
}

impl PreferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: impl IntoIterator<Item = PreferenceFact>) -> Self {
        let mut graph = Self::new();
        for fact in facts {
            graph.add_fact(fact);
        }
        graph
    }

    /// Append one fact. Repeated facts are kept in the log but add no edge.
    pub fn add_fact(&mut self, fact: PreferenceFact) {
        self.facts.push(fact);
        let lesser = self.edges.entry(fact.greater).or_default();
        if !lesser.contains(&fact.lesser) {
            lesser.push(fact.lesser);
        }
    }

    pub fn prefer(&mut self, greater: ItemId, lesser: ItemId) {
        self.add_fact(PreferenceFact::new(greater, lesser));
    }

    pub fn facts(&self) -> &[PreferenceFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Items `id` was directly preferred over.
    pub fn successors(&self, id: ItemId) -> &[ItemId] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every item reachable from `id` through one or more "greater" edges.
    pub fn descendants(&self, id: ItemId) -> HashSet<ItemId> {
        let mut seen = HashSet::new();
        let mut stack: Vec<ItemId> = self.successors(id).to_vec();
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend_from_slice(self.successors(next));
            }
        }
        seen
    }

    /// True when the facts prove `from` > `to`, directly or transitively.
    pub fn reaches(&self, from: ItemId, to: ItemId) -> bool {
        let mut seen = HashSet::new();
        let mut stack: Vec<ItemId> = self.successors(from).to_vec();
        while let Some(next) = stack.pop() {
            if next == to {
                return true;
            }
            if seen.insert(next) {
                stack.extend_from_slice(self.successors(next));
            }
        }
        false
    }

    /// What the facts prove about `a` relative to `b`. `None` means unknown.
    pub fn resolve(&self, a: ItemId, b: ItemId) -> Option<Relation> {
        if a == b {
            Some(Relation::Equal)
        } else if self.reaches(a, b) {
            Some(Relation::Greater)
        } else if self.reaches(b, a) {
            Some(Relation::Lesser)
        } else {
            None
        }
    }

    /// Find a cycle in the "greater" relation, if the facts contain one.
    ///
    /// Returns the items on the cycle in edge order; the last item points back
    /// at the first. Roots are visited in ascending ID order so the reported
    /// cycle is stable for a given fact set.
    pub fn find_cycle(&self) -> Option<Vec<ItemId>> {
        let mut finished: HashSet<ItemId> = HashSet::new();

        for &root in self.edges.keys() {
            if finished.contains(&root) {
                continue;
            }

            // (node, index of the next successor to visit)
            let mut path: Vec<(ItemId, usize)> = vec![(root, 0)];
            let mut on_path: HashSet<ItemId> = HashSet::from([root]);

            while let Some(top) = path.last_mut() {
                let (node, next) = *top;
                let successors = self.successors(node);
                if next < successors.len() {
                    top.1 += 1;
                    let child = successors[next];
                    if on_path.contains(&child) {
                        let start = path.iter().position(|&(n, _)| n == child)?;
                        return Some(path[start..].iter().map(|&(n, _)| n).collect());
                    }
                    if !finished.contains(&child) {
                        on_path.insert(child);
                        path.push((child, 0));
                    }
                } else {
                    on_path.remove(&node);
                    finished.insert(node);
                    path.pop();
                }
            }
        }

        None
    }
}

impl From<Vec<PreferenceFact>> for PreferenceGraph {
    fn from(facts: Vec<PreferenceFact>) -> Self {
        Self::from_facts(facts)
    }
}

impl From<PreferenceGraph> for Vec<PreferenceFact> {
    fn from(graph: PreferenceGraph) -> Self {
        graph.facts
    }
}
