#![forbid(unsafe_code)]

//! Edit batches.
//!
//! An [`EditBatch`] is everything one reconciliation pass has to tell the
//! rendering surface, grouped by primitive. The surface applies the
//! structural groups in field order inside one transaction:
//!
//! 1. `section_inserts` (new indices)
//! 2. `section_deletes` (old indices)
//! 3. `section_reloads` (old indices)
//! 4. `section_moves` (old -> new), only for reordered survivors
//! 5. `row_moves` (old path -> new path)
//! 6. `row_inserts` (new paths)
//! 7. `row_deletes` (old paths)
//!
//! `content_reloads` are not structural. They address rows by their old
//! path and are applied to bound visuals before the transaction opens.
//!
//! # Invariants
//!
//! 1. Old-space and new-space indices are never mixed within one group.
//! 2. Row deletes and row-move sources never overlap; row inserts and
//!    row-move targets never overlap.
//! 3. Row edits only address sections that survive the batch.

use std::fmt;

use bitflags::bitflags;
use flist_core::{IndexPath, IndexSet, SectionState};

use crate::section_diff::{SectionMatch, diff_sections};

/// A row whose content must be rebound in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentReload {
    /// Position of the currently bound visual, before the batch.
    pub old: IndexPath,
    /// Position of the row in the new snapshot.
    pub new: IndexPath,
}

/// Ordered edit groups for one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditBatch {
    pub section_inserts: IndexSet,
    pub section_deletes: IndexSet,
    pub section_reloads: IndexSet,
    pub section_moves: Vec<(usize, usize)>,
    pub row_moves: Vec<(IndexPath, IndexPath)>,
    pub row_inserts: Vec<IndexPath>,
    pub row_deletes: Vec<IndexPath>,
    pub content_reloads: Vec<ContentReload>,
}

bitflags! {
    /// Which edit groups of a batch are non-empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EditKinds: u8 {
        const SECTION_INSERT = 0b0000_0001;
        const SECTION_DELETE = 0b0000_0010;
        const SECTION_RELOAD = 0b0000_0100;
        const SECTION_MOVE   = 0b0000_1000;
        const ROW_MOVE       = 0b0001_0000;
        const ROW_INSERT     = 0b0010_0000;
        const ROW_DELETE     = 0b0100_0000;
        const CONTENT_RELOAD = 0b1000_0000;

        const STRUCTURAL = Self::SECTION_INSERT.bits()
            | Self::SECTION_DELETE.bits()
            | Self::SECTION_RELOAD.bits()
            | Self::SECTION_MOVE.bits()
            | Self::ROW_MOVE.bits()
            | Self::ROW_INSERT.bits()
            | Self::ROW_DELETE.bits();
    }
}

/// Per-group edit counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditStats {
    pub section_inserts: usize,
    pub section_deletes: usize,
    pub section_reloads: usize,
    pub section_moves: usize,
    pub row_moves: usize,
    pub row_inserts: usize,
    pub row_deletes: usize,
    pub content_reloads: usize,
}

impl EditStats {
    /// Number of structural edits.
    #[must_use]
    pub const fn structural(&self) -> usize {
        self.section_inserts
            + self.section_deletes
            + self.section_reloads
            + self.section_moves
            + self.row_moves
            + self.row_inserts
            + self.row_deletes
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.structural() + self.content_reloads
    }
}

impl fmt::Display for EditStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sections +{} -{} ~{} >{} | rows >{} +{} -{} | reloads {}",
            self.section_inserts,
            self.section_deletes,
            self.section_reloads,
            self.section_moves,
            self.row_moves,
            self.row_inserts,
            self.row_deletes,
            self.content_reloads
        )
    }
}

impl EditBatch {
    /// No edit of any kind: the pass is inert.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content_reloads.is_empty() && !self.has_structural_edits()
    }

    /// Whether a structural transaction is needed.
    #[must_use]
    pub fn has_structural_edits(&self) -> bool {
        !(self.section_inserts.is_empty()
            && self.section_deletes.is_empty()
            && self.section_reloads.is_empty()
            && self.section_moves.is_empty()
            && self.row_moves.is_empty()
            && self.row_inserts.is_empty()
            && self.row_deletes.is_empty())
    }

    #[must_use]
    pub fn stats(&self) -> EditStats {
        EditStats {
            section_inserts: self.section_inserts.len(),
            section_deletes: self.section_deletes.len(),
            section_reloads: self.section_reloads.len(),
            section_moves: self.section_moves.len(),
            row_moves: self.row_moves.len(),
            row_inserts: self.row_inserts.len(),
            row_deletes: self.row_deletes.len(),
            content_reloads: self.content_reloads.len(),
        }
    }

    #[must_use]
    pub fn kinds(&self) -> EditKinds {
        let mut kinds = EditKinds::empty();
        kinds.set(EditKinds::SECTION_INSERT, !self.section_inserts.is_empty());
        kinds.set(EditKinds::SECTION_DELETE, !self.section_deletes.is_empty());
        kinds.set(EditKinds::SECTION_RELOAD, !self.section_reloads.is_empty());
        kinds.set(EditKinds::SECTION_MOVE, !self.section_moves.is_empty());
        kinds.set(EditKinds::ROW_MOVE, !self.row_moves.is_empty());
        kinds.set(EditKinds::ROW_INSERT, !self.row_inserts.is_empty());
        kinds.set(EditKinds::ROW_DELETE, !self.row_deletes.is_empty());
        kinds.set(EditKinds::CONTENT_RELOAD, !self.content_reloads.is_empty());
        kinds
    }
}

/// Diff two snapshots' section lists into one batch.
///
/// Total over any input. Duplicate identities resolve by first-unclaimed
/// matching at both levels.
#[must_use]
pub fn diff_snapshots<S: SectionState>(old: &[S], new: &[S]) -> EditBatch {
    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!(
        "flist.diff",
        old_sections = old.len(),
        new_sections = new.len(),
        diff_duration_us = tracing::field::Empty,
    );
    #[cfg(feature = "tracing")]
    let _guard = span.enter();
    #[cfg(feature = "tracing")]
    let start = web_time::Instant::now();

    let sections = diff_sections(old, new);
    let mut batch = EditBatch {
        section_inserts: sections.inserts,
        section_deletes: sections.deletes,
        section_reloads: sections.reloads,
        section_moves: sections.moves,
        ..EditBatch::default()
    };

    for SectionMatch {
        old_index,
        new_index,
        rows,
    } in sections.matched
    {
        let old_path = |row| IndexPath::new(old_index, row);
        let new_path = |row| IndexPath::new(new_index, row);
        batch.content_reloads.extend(
            rows.reloads
                .iter()
                .map(|&(old, new)| ContentReload {
                    old: old_path(old),
                    new: new_path(new),
                }),
        );
        batch.row_moves.extend(
            rows.moves
                .iter()
                .map(|&(old, new)| (old_path(old), new_path(new))),
        );
        batch
            .row_inserts
            .extend(rows.inserts.iter().map(|&row| new_path(row)));
        batch
            .row_deletes
            .extend(rows.deletes.iter().map(|&row| old_path(row)));
    }

    #[cfg(feature = "tracing")]
    {
        span.record("diff_duration_us", start.elapsed().as_micros() as u64);
        tracing::trace!(stats = %batch.stats(), "flist.diff.done");
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use flist_core::{HeaderFooter, Row, Section, Visual};
    use std::rc::Rc;

    #[derive(Clone)]
    struct Handle(Rc<()>);

    impl Visual for Handle {
        fn same_visual(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    fn section(id: &str, rows: &[(&str, &str)]) -> Section<Handle> {
        Section::new(id).rows(
            rows.iter()
                .map(|(r, v)| Row::new(*r, "cell").content_version(*v)),
        )
    }

    #[test]
    fn inert_pass_is_empty() {
        let snap = vec![section("s", &[("a", "1"), ("b", "1")])];
        let batch = diff_snapshots(&snap, &snap);
        assert!(batch.is_empty());
        assert_eq!(batch.kinds(), EditKinds::empty());
        assert_eq!(batch.stats().total(), 0);
    }

    #[test]
    fn row_edits_use_the_right_section_space() {
        // "b" shifts from section 1 to section 0 when "a" is deleted.
        let old = vec![
            section("a", &[]),
            section("b", &[("x", "1"), ("y", "1")]),
        ];
        let new = vec![section("b", &[("y", "2"), ("z", "1")])];
        let batch = diff_snapshots(&old, &new);
        assert_eq!(batch.section_deletes.as_slice(), &[0]);
        assert!(batch.section_moves.is_empty());
        assert_eq!(batch.row_deletes, vec![IndexPath::new(1, 0)]);
        assert_eq!(
            batch.row_moves,
            vec![(IndexPath::new(1, 1), IndexPath::new(0, 0))]
        );
        assert_eq!(batch.row_inserts, vec![IndexPath::new(0, 1)]);
        assert_eq!(
            batch.content_reloads,
            vec![ContentReload {
                old: IndexPath::new(1, 1),
                new: IndexPath::new(0, 0),
            }]
        );
    }

    #[test]
    fn content_only_change_is_not_structural() {
        let old = vec![section("s", &[("a", "v1")])];
        let new = vec![section("s", &[("a", "v2")])];
        let batch = diff_snapshots(&old, &new);
        assert!(!batch.is_empty());
        assert!(!batch.has_structural_edits());
        assert_eq!(batch.kinds(), EditKinds::CONTENT_RELOAD);
    }

    #[test]
    fn header_reload_has_no_row_edits() {
        let old = vec![section("s1", &[("a", "1")]).header(HeaderFooter::margin(0.0))];
        let new = vec![section("s1", &[("a", "1")]).header(HeaderFooter::text("hi", 8.0, 0.0))];
        let batch = diff_snapshots(&old, &new);
        assert_eq!(batch.section_reloads.as_slice(), &[0]);
        assert!(batch.row_moves.is_empty() && batch.row_inserts.is_empty());
        assert!(batch.row_deletes.is_empty() && batch.content_reloads.is_empty());
        assert!(batch.kinds().intersects(EditKinds::STRUCTURAL));
    }

    #[test]
    fn stats_display_is_compact() {
        let old = vec![section("s", &[("a", "1")])];
        let new = vec![section("s", &[("b", "1")]), section("t", &[])];
        let stats = diff_snapshots(&old, &new).stats();
        assert_eq!(stats.to_string(), "sections +1 -0 ~0 >0 | rows >0 +1 -1 | reloads 0");
        assert_eq!(stats.structural(), 3);
    }
}
