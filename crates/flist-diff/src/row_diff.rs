#![forbid(unsafe_code)]

//! Row reconciler.
//!
//! Diffs the row lists of one matched section pair. Indices are local to
//! the section: old indices address the pre-batch list, new indices the
//! post-batch list.
//!
//! # Invariants
//!
//! 1. `deletes` and the move sources are disjoint subsets of the old range.
//! 2. `inserts` and the move targets are disjoint subsets of the new range.
//! 3. A row that kept its index never appears as a move.
//! 4. Content reloads are recorded independently of moves: a moved row with
//!    a changed version yields both.

use flist_core::{Identified, content_changed};

use crate::matching::Matching;

/// Edits for one section's rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowEdits {
    /// `(old_index, new_index)` of matched rows whose content changed.
    pub reloads: Vec<(usize, usize)>,
    /// `(old_index, new_index)` of matched rows whose index changed.
    pub moves: Vec<(usize, usize)>,
    /// New indices of unmatched new rows, ascending.
    pub inserts: Vec<usize>,
    /// Old indices of unmatched old rows, ascending.
    pub deletes: Vec<usize>,
}

impl RowEdits {
    /// No edit of any kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reloads.is_empty() && !self.has_structural_edits()
    }

    /// Any move, insert or delete.
    #[must_use]
    pub fn has_structural_edits(&self) -> bool {
        !(self.moves.is_empty() && self.inserts.is_empty() && self.deletes.is_empty())
    }
}

/// Diff two row lists by identity.
#[must_use]
pub fn diff_rows<A, B>(old: &[A], new: &[B]) -> RowEdits
where
    A: Identified,
    B: Identified,
{
    let matching = Matching::compute(old, new);
    let mut edits = RowEdits::default();

    for (old_index, row) in old.iter().enumerate() {
        let Some(new_index) = matching.new_index(old_index) else {
            edits.deletes.push(old_index);
            continue;
        };
        if content_changed(row, &new[new_index]) {
            edits.reloads.push((old_index, new_index));
        }
        if new_index != old_index {
            edits.moves.push((old_index, new_index));
        }
    }
    edits.inserts.extend(matching.unclaimed_new());
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use flist_core::{ContentVersion, ItemId};

    struct Item {
        id: ItemId,
        version: Option<ContentVersion>,
    }

    impl Identified for Item {
        fn id(&self) -> &ItemId {
            &self.id
        }

        fn content_version(&self) -> Option<&ContentVersion> {
            self.version.as_ref()
        }
    }

    fn rows(plan: &[(&str, Option<&str>)]) -> Vec<Item> {
        plan.iter()
            .map(|(id, v)| Item {
                id: ItemId::from(*id),
                version: v.map(ContentVersion::from),
            })
            .collect()
    }

    fn plain(ids: &[&str]) -> Vec<Item> {
        rows(&ids.iter().map(|id| (*id, None)).collect::<Vec<_>>())
    }

    #[test]
    fn identical_lists_yield_nothing() {
        let a = rows(&[("a", Some("1")), ("b", None)]);
        assert!(diff_rows(&a, &a).is_empty());
    }

    #[test]
    fn rotation_is_moves_only() {
        let edits = diff_rows(&plain(&["A", "B", "C"]), &plain(&["C", "A", "B"]));
        assert_eq!(edits.moves, vec![(0, 1), (1, 2), (2, 0)]);
        assert!(edits.inserts.is_empty());
        assert!(edits.deletes.is_empty());
        assert!(edits.reloads.is_empty());
    }

    #[test]
    fn replace_tail_row() {
        let edits = diff_rows(&plain(&["A", "B"]), &plain(&["A", "C"]));
        assert_eq!(edits.deletes, vec![1]);
        assert_eq!(edits.inserts, vec![1]);
        assert!(edits.moves.is_empty());
    }

    #[test]
    fn version_bump_in_place_reloads() {
        let edits = diff_rows(&rows(&[("A", Some("v1"))]), &rows(&[("A", Some("v2"))]));
        assert_eq!(edits.reloads, vec![(0, 0)]);
        assert!(edits.moves.is_empty());
        assert!(!edits.has_structural_edits());
    }

    #[test]
    fn moved_and_changed_row_records_both() {
        let old = rows(&[("A", Some("1")), ("B", Some("1"))]);
        let new = rows(&[("B", Some("1")), ("A", Some("2"))]);
        let edits = diff_rows(&old, &new);
        assert_eq!(edits.reloads, vec![(0, 1)]);
        assert_eq!(edits.moves, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn absent_version_never_reloads() {
        let edits = diff_rows(&rows(&[("A", None)]), &rows(&[("A", Some("v9"))]));
        assert!(edits.is_empty());
    }

    #[test]
    fn empty_transitions() {
        let edits = diff_rows(&plain(&[]), &plain(&["A", "B"]));
        assert_eq!(edits.inserts, vec![0, 1]);
        assert!(edits.deletes.is_empty() && edits.moves.is_empty());

        let edits = diff_rows(&plain(&["A", "B"]), &plain(&[]));
        assert_eq!(edits.deletes, vec![0, 1]);
        assert!(edits.inserts.is_empty() && edits.moves.is_empty());
    }

    #[test]
    fn head_insert_shifts_survivors() {
        let edits = diff_rows(&plain(&["A", "B"]), &plain(&["X", "A", "B"]));
        assert_eq!(edits.inserts, vec![0]);
        assert_eq!(edits.moves, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn duplicate_identities_use_first_unclaimed() {
        // Pins current behaviour only.
        let edits = diff_rows(&plain(&["D", "D"]), &plain(&["D"]));
        assert_eq!(edits.deletes, vec![1]);
        assert!(edits.inserts.is_empty());
        assert!(edits.moves.is_empty());
    }
}
