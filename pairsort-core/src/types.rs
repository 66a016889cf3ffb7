use std::collections::HashMap;

use crate::error::RankError;

/// Caller-provided stable identity of a ranked item.
pub type ItemId = i64;

/// Two items whose relative order is being asked about.
pub type Pair = (ItemId, ItemId);

/// One recorded judgment: `greater` is preferred over `lesser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceFact {
    pub greater: ItemId,
    pub lesser: ItemId,
}

impl PreferenceFact {
    pub fn new(greater: ItemId, lesser: ItemId) -> Self {
        PreferenceFact { greater, lesser }
    }
}

/// How the left operand of a comparison relates to the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Greater,
    Lesser,
    Equal,
}

impl Relation {
    pub fn reverse(self) -> Self {
        match self {
            Relation::Greater => Relation::Lesser,
            Relation::Lesser => Relation::Greater,
            Relation::Equal => Relation::Equal,
        }
    }
}

/// Result of asking the oracle about a pair. `None` means "not known yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonOutcome {
    pub relation: Option<Relation>,
}

impl ComparisonOutcome {
    pub fn known(relation: Relation) -> Self {
        ComparisonOutcome { relation: Some(relation) }
    }

    pub fn unknown() -> Self {
        ComparisonOutcome { relation: None }
    }

    pub fn succeeded(&self) -> bool {
        self.relation.is_some()
    }
}

/// Outcome of one ranking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortResult {
    /// True when every comparison the sort needed could be answered.
    pub completed: bool,
    /// Items in ascending preference (least preferred first). When the attempt
    /// is incomplete this is the arrangement reached at the point of failure.
    pub order: Vec<ItemId>,
    /// The comparison that blocked the attempt. `None` iff `completed`.
    pub unresolved_pair: Option<Pair>,
}

impl SortResult {
    pub fn complete(order: Vec<ItemId>) -> Self {
        SortResult { completed: true, order, unresolved_pair: None }
    }

    pub fn blocked(order: Vec<ItemId>, pair: Pair) -> Self {
        SortResult { completed: false, order, unresolved_pair: Some(pair) }
    }
}

/// Maps between caller-provided i64 IDs and internal 0..N indices.
#[derive(Debug, Clone)]
pub(crate) struct IdMap {
    ids: Vec<ItemId>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl IdMap {
    pub fn from_ids(ids: &[ItemId]) -> Result<Self, RankError> {
        let mut id_to_idx = HashMap::with_capacity(ids.len());
        for (idx, &id) in ids.iter().enumerate() {
            if id_to_idx.insert(id, idx).is_some() {
                return Err(RankError::DuplicateItem(id));
            }
        }
        Ok(IdMap {
            ids: ids.to_vec(),
            id_to_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn get(&self, id: ItemId) -> Option<usize> {
        self.id_to_idx.get(&id).copied()
    }
}
