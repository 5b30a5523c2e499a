#![forbid(unsafe_code)]

//! Section reconciler.
//!
//! Matches sections by identity with the same first-unclaimed policy as
//! rows, flags header/footer state changes, and hands every surviving pair
//! to the row reconciler.
//!
//! Sections that only shift because of inserts or deletes before them are
//! not moved: the surface places unmoved survivors in their original order.
//! Moves are emitted only when survivors change relative order, and then
//! only for the survivors outside one longest in-order run.

use flist_core::{IndexSet, SectionState};

use crate::matching::Matching;
use crate::row_diff::{RowEdits, diff_rows};

/// A surviving section: its position on both sides and its row edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch {
    pub old_index: usize,
    pub new_index: usize,
    pub rows: RowEdits,
}

/// Section-level edits plus per-survivor row edits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionEdits {
    /// New indices.
    pub inserts: IndexSet,
    /// Old indices.
    pub deletes: IndexSet,
    /// Old indices of survivors whose header or footer changed.
    pub reloads: IndexSet,
    /// `(old_index, new_index)` of survivors that left the relative order
    /// of the others. A reordered survivor may keep its index.
    pub moves: Vec<(usize, usize)>,
    /// Every survivor, in old order.
    pub matched: Vec<SectionMatch>,
}

impl SectionEdits {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.deletes.is_empty()
            && self.reloads.is_empty()
            && self.moves.is_empty()
            && self.matched.iter().all(|m| m.rows.is_empty())
    }
}

/// Diff two section lists.
#[must_use]
pub fn diff_sections<S: SectionState>(old: &[S], new: &[S]) -> SectionEdits {
    let matching = Matching::compute(old, new);
    let mut edits = SectionEdits::default();

    for (old_index, section) in old.iter().enumerate() {
        let Some(new_index) = matching.new_index(old_index) else {
            edits.deletes.insert(old_index);
            continue;
        };
        let target = &new[new_index];
        if !section.same_state(target) {
            edits.reloads.insert(old_index);
        }
        edits.matched.push(SectionMatch {
            old_index,
            new_index,
            rows: diff_rows(section.rows(), target.rows()),
        });
    }
    edits.inserts.extend(matching.unclaimed_new());

    let targets: Vec<usize> = edits.matched.iter().map(|m| m.new_index).collect();
    edits.moves = edits
        .matched
        .iter()
        .zip(out_of_order(&targets))
        .filter(|(_, moved)| *moved)
        .map(|(m, _)| (m.old_index, m.new_index))
        .collect();
    edits
}

/// Flags every position of `targets` outside one longest strictly
/// increasing subsequence.
fn out_of_order(targets: &[usize]) -> Vec<bool> {
    // tails[k]: position ending the lowest-valued run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; targets.len()];
    for (i, &target) in targets.iter().enumerate() {
        let k = tails.partition_point(|&j| targets[j] < target);
        prev[i] = k.checked_sub(1).map(|k| tails[k]);
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }

    let mut moved = vec![true; targets.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        moved[i] = false;
        cursor = prev[i];
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use flist_core::{HeaderFooter, Row, Section};
    use std::rc::Rc;

    #[derive(Clone)]
    struct Handle(Rc<()>);

    impl flist_core::Visual for Handle {
        fn same_visual(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    fn section(id: &str, rows: &[&str]) -> Section<Handle> {
        Section::new(id).rows(rows.iter().map(|r| Row::new(*r, "cell")))
    }

    #[test]
    fn header_change_reloads_without_row_edits() {
        let old = vec![section("s1", &["a"]).header(HeaderFooter::margin(0.0))];
        let new = vec![section("s1", &["a"]).header(HeaderFooter::text("hi", 8.0, 0.0))];
        let edits = diff_sections(&old, &new);
        assert_eq!(edits.reloads.as_slice(), &[0]);
        assert_eq!(edits.matched.len(), 1);
        assert!(edits.matched[0].rows.is_empty());
        assert!(edits.moves.is_empty());
    }

    #[test]
    fn insert_and_delete_use_separate_index_spaces() {
        let old = vec![section("a", &[]), section("b", &[]), section("c", &[])];
        let new = vec![section("x", &[]), section("a", &[]), section("c", &[])];
        let edits = diff_sections(&old, &new);
        assert_eq!(edits.deletes.as_slice(), &[1]);
        assert_eq!(edits.inserts.as_slice(), &[0]);
        assert!(edits.moves.is_empty());
    }

    #[test]
    fn shifted_sections_are_not_moved() {
        let old = vec![section("a", &["1"]), section("b", &[])];
        let new = vec![section("x", &[]), section("a", &["1"]), section("b", &[])];
        let edits = diff_sections(&old, &new);
        assert_eq!(edits.inserts.as_slice(), &[0]);
        assert!(edits.moves.is_empty());
        assert!(edits.matched.iter().all(|m| m.rows.is_empty()));
    }

    #[test]
    fn reorder_moves_only_sections_outside_the_in_order_run() {
        let old = vec![
            section("a", &[]),
            section("b", &[]),
            section("c", &[]),
            section("d", &[]),
        ];
        // b, c, d keep their relative order; a jumps to the end.
        let new = vec![
            section("b", &[]),
            section("c", &[]),
            section("d", &[]),
            section("a", &[]),
        ];
        assert_eq!(diff_sections(&old, &new).moves, vec![(0, 3)]);
    }

    #[test]
    fn reversal_can_move_a_section_onto_its_own_index() {
        let old = vec![section("a", &[]), section("b", &[]), section("c", &[])];
        let new = vec![section("c", &[]), section("b", &[]), section("a", &[])];
        assert_eq!(diff_sections(&old, &new).moves, vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn out_of_order_keeps_a_longest_run() {
        assert_eq!(out_of_order(&[]), Vec::<bool>::new());
        assert_eq!(out_of_order(&[0, 1, 2]), vec![false, false, false]);
        assert_eq!(out_of_order(&[1, 0]), vec![true, false]);
        assert_eq!(out_of_order(&[3, 0, 1, 2]), vec![true, false, false, false]);
    }

    #[test]
    fn survivors_carry_row_edits() {
        let old = vec![section("s", &["a", "b"])];
        let new = vec![section("s", &["b", "a", "c"])];
        let edits = diff_sections(&old, &new);
        let rows = &edits.matched[0].rows;
        assert_eq!(rows.moves, vec![(0, 1), (1, 0)]);
        assert_eq!(rows.inserts, vec![2]);
    }

    #[test]
    fn footer_spinner_toggle_reloads() {
        let old = vec![section("s", &["a"]).footer(HeaderFooter::Spinner)];
        let new = vec![section("s", &["a"])];
        assert_eq!(diff_sections(&old, &new).reloads.as_slice(), &[0]);
    }

    #[test]
    fn unchanged_sections_are_empty() {
        let old = vec![section("a", &["1", "2"]), section("b", &[])];
        assert!(diff_sections(&old, &old.clone()).is_empty());
    }
}
