/// Oracle-driven insertion sort for short ranges and pivot samples.
use crate::oracle::Oracle;
use crate::types::{ItemId, Pair, Relation};

/// Sort `entries` ascending, asking `oracle` about adjacent pairs only.
///
/// Stops at the first comparison the oracle cannot answer and returns that
/// pair as `(left neighbour, item being inserted)`. The item being inserted is
/// left at its original position, so on failure `entries` is still a
/// permutation of the input and every insertion that finished stays in place.
pub fn insertion_sort<O: Oracle + ?Sized>(entries: &mut [ItemId], oracle: &O) -> Result<(), Pair> {
    for index in 1..entries.len() {
        let entry = entries[index];
        let mut slot = index;

        while slot > 0 {
            let neighbour = entries[slot - 1];
            match oracle.compare(neighbour, entry).relation {
                None => return Err((neighbour, entry)),
                Some(Relation::Greater) => slot -= 1,
                Some(_) => break,
            }
        }

        entries[slot..=index].rotate_right(1);
    }
    Ok(())
}
