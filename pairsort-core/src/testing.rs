//! Oracles shared by the unit tests.
use std::cell::Cell;
use std::cmp::Ordering;

use crate::oracle::Oracle;
use crate::types::{ComparisonOutcome, ItemId, Pair, Relation};

/// Larger ID = more preferred, except for pairs listed as unknown.
/// Counts every comparison it answers or refuses.
pub(crate) struct ById {
    pub unknown: Vec<Pair>,
    pub calls: Cell<usize>,
}

impl ById {
    pub fn total() -> Self {
        ById { unknown: Vec::new(), calls: Cell::new(0) }
    }

    pub fn with_unknown(unknown: &[Pair]) -> Self {
        ById { unknown: unknown.to_vec(), calls: Cell::new(0) }
    }
}

impl Oracle for ById {
    fn compare(&self, a: ItemId, b: ItemId) -> ComparisonOutcome {
        self.calls.set(self.calls.get() + 1);
        if self.unknown.contains(&(a, b)) || self.unknown.contains(&(b, a)) {
            return ComparisonOutcome::unknown();
        }
        ComparisonOutcome::known(match a.cmp(&b) {
            Ordering::Greater => Relation::Greater,
            Ordering::Less => Relation::Lesser,
            Ordering::Equal => Relation::Equal,
        })
    }
}
