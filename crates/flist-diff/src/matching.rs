#![forbid(unsafe_code)]

//! Greedy identity matching.
//!
//! Each old item, visited in order, claims the first still-unclaimed new
//! item carrying the same identity. Items left over on either side are
//! deletions (old) or insertions (new).
//!
//! # Invariants
//!
//! 1. Every new index is claimed by at most one old index.
//! 2. For unique identities the matching is the obvious bijection on the
//!    shared identities.
//! 3. With duplicate identities the k-th old occurrence pairs with the k-th
//!    new occurrence. This tie-break is deterministic but not meaningful;
//!    callers are expected to keep identities unique.
//!
//! # Complexity
//!
//! O(n + m) expected: one hash-map pass over the new items, one lookup per
//! old item. A shared prefix of equal identities is matched positionally
//! without touching the map, which keeps the common "append at the end" and
//! "nothing changed" cases allocation-light.

use ahash::AHashMap;
use smallvec::SmallVec;

use flist_core::Identified;

/// Result of matching an old sequence against a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matching {
    old_to_new: Vec<Option<usize>>,
    claimed: Vec<bool>,
}

impl Matching {
    /// Match `old` against `new` by identity.
    #[must_use]
    pub fn compute<A, B>(old: &[A], new: &[B]) -> Self
    where
        A: Identified,
        B: Identified,
    {
        let mut old_to_new = vec![None; old.len()];
        let mut claimed = vec![false; new.len()];

        // Positional prefix: an equal identity at an equal position is always
        // the first unclaimed candidate, since every earlier new slot with the
        // same identity was already claimed by its positional twin.
        let prefix = old
            .iter()
            .zip(new)
            .take_while(|(a, b)| a.id() == b.id())
            .count();
        for (index, slot) in old_to_new.iter_mut().enumerate().take(prefix) {
            *slot = Some(index);
        }
        claimed[..prefix].fill(true);
        if prefix == old.len() || prefix == new.len() {
            return Self {
                old_to_new,
                claimed,
            };
        }

        // Candidates per identity, stored in descending order so `pop`
        // yields the lowest unclaimed index.
        let mut candidates: AHashMap<&str, SmallVec<[usize; 1]>> =
            AHashMap::with_capacity(new.len() - prefix);
        for (index, item) in new.iter().enumerate().skip(prefix).rev() {
            candidates
                .entry(item.id().as_str())
                .or_default()
                .push(index);
        }

        for (old_index, item) in old.iter().enumerate().skip(prefix) {
            if let Some(queue) = candidates.get_mut(item.id().as_str())
                && let Some(new_index) = queue.pop()
            {
                old_to_new[old_index] = Some(new_index);
                claimed[new_index] = true;
            }
        }

        Self {
            old_to_new,
            claimed,
        }
    }

    /// New index matched to `old_index`, if any.
    #[inline]
    #[must_use]
    pub fn new_index(&self, old_index: usize) -> Option<usize> {
        self.old_to_new.get(old_index).copied().flatten()
    }

    /// Whether the new item at `new_index` was claimed by some old item.
    #[inline]
    #[must_use]
    pub fn is_claimed(&self, new_index: usize) -> bool {
        self.claimed.get(new_index).copied().unwrap_or(false)
    }

    /// `(old_index, new_index)` pairs in old order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.old_to_new
            .iter()
            .enumerate()
            .filter_map(|(old, new)| new.map(|new| (old, new)))
    }

    /// Old indices without a partner, ascending.
    pub fn unmatched_old(&self) -> impl Iterator<Item = usize> + '_ {
        self.old_to_new
            .iter()
            .enumerate()
            .filter_map(|(old, new)| new.is_none().then_some(old))
    }

    /// New indices nobody claimed, ascending.
    pub fn unclaimed_new(&self) -> impl Iterator<Item = usize> + '_ {
        self.claimed
            .iter()
            .enumerate()
            .filter_map(|(new, claimed)| (!claimed).then_some(new))
    }

    /// True when both sides have the same length and every item kept its
    /// position.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.old_to_new.len() == self.claimed.len()
            && self
                .old_to_new
                .iter()
                .enumerate()
                .all(|(old, new)| *new == Some(old))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flist_core::ItemId;

    struct Id(ItemId);

    impl Identified for Id {
        fn id(&self) -> &ItemId {
            &self.0
        }
    }

    fn ids(keys: &[&str]) -> Vec<Id> {
        keys.iter().map(|k| Id(ItemId::from(*k))).collect()
    }

    #[test]
    fn identical_sequences_match_positionally() {
        let m = Matching::compute(&ids(&["a", "b", "c"]), &ids(&["a", "b", "c"]));
        assert!(m.is_positional());
        assert_eq!(m.unmatched_old().count(), 0);
        assert_eq!(m.unclaimed_new().count(), 0);
    }

    #[test]
    fn reorder_matches_every_item() {
        let m = Matching::compute(&ids(&["a", "b", "c"]), &ids(&["c", "a", "b"]));
        assert_eq!(m.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 0)]);
        assert!(!m.is_positional());
    }

    #[test]
    fn leftovers_are_reported_in_order() {
        let m = Matching::compute(&ids(&["a", "b", "x"]), &ids(&["y", "a", "z"]));
        assert_eq!(m.unmatched_old().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(m.unclaimed_new().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(m.new_index(0), Some(1));
        assert!(m.is_claimed(1));
        assert!(!m.is_claimed(9));
    }

    #[test]
    fn duplicates_pair_in_occurrence_order() {
        // Pins the current tie-break; duplicate identities are caller error.
        let m = Matching::compute(&ids(&["d", "x", "d"]), &ids(&["d", "d", "d"]));
        assert_eq!(m.pairs().collect::<Vec<_>>(), vec![(0, 0), (2, 1)]);
        assert_eq!(m.unclaimed_new().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn prefix_does_not_steal_later_duplicates() {
        let m = Matching::compute(&ids(&["a", "a", "b"]), &ids(&["a", "b", "a"]));
        assert_eq!(m.pairs().collect::<Vec<_>>(), vec![(0, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn empty_sides() {
        let none: Vec<Id> = Vec::new();
        let m = Matching::compute(&none, &ids(&["a", "b"]));
        assert_eq!(m.unclaimed_new().collect::<Vec<_>>(), vec![0, 1]);
        let m = Matching::compute(&ids(&["a", "b"]), &none);
        assert_eq!(m.unmatched_old().collect::<Vec<_>>(), vec![0, 1]);
    }
}
