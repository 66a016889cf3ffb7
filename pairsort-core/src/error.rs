/// Errors raised by the ranking core.
///
/// A comparison the graph cannot answer yet is *not* an error: it is reported
/// through `SortResult::unresolved_pair`.
use thiserror::Error;

use crate::types::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// Engine configured with an insertion threshold below 1.
    #[error("insertion threshold must be at least 1, got {0}")]
    InvalidInsertionThreshold(usize),

    /// The same item ID appeared twice in one ranking attempt or list.
    #[error("duplicate item ID: {0}")]
    DuplicateItem(ItemId),

    /// An item ID that is not part of the ranking list.
    #[error("unknown item ID: {0}")]
    UnknownItem(ItemId),

    /// A preference of an item over itself.
    #[error("item {0} cannot be preferred over itself")]
    SelfPreference(ItemId),

    /// A new preference would reverse one the graph already proves.
    #[error("preference {greater} > {lesser} contradicts recorded preferences")]
    Contradiction { greater: ItemId, lesser: ItemId },

    /// The recorded facts already contain a cycle (A > ... > A).
    #[error("recorded preferences are inconsistent: cycle through {cycle:?}")]
    Inconsistent { cycle: Vec<ItemId> },
}
