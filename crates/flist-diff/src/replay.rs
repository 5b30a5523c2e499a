#![forbid(unsafe_code)]

//! Structural replay of an [`EditBatch`].
//!
//! Models how a batch-updating list surface resolves one transaction:
//! deletes and move sources address the pre-batch structure, inserts and
//! move targets the post-batch structure. Survivors that neither moved nor
//! were deleted fill the remaining slots in their original order. Like a
//! real surface, the replay validates the batch against the post-batch row
//! counts and rejects inconsistent batches instead of guessing.
//!
//! Content reloads and section reloads do not change structure; section
//! reloads are reported on the resulting section so callers can refresh
//! headers and footers.

use std::fmt;

use thiserror::Error;

use flist_core::{IndexPath, ItemId, Outline};

use crate::batch::EditBatch;

/// Which side of the batch an index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    Old,
    New,
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Old => "old",
            Self::New => "new",
        })
    }
}

/// A batch the surface cannot apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("{space} section {index} out of range ({len} sections)")]
    SectionOutOfRange {
        space: IndexSpace,
        index: usize,
        len: usize,
    },

    #[error("{space} row {path} out of range ({len} rows)")]
    RowOutOfRange {
        space: IndexSpace,
        path: IndexPath,
        len: usize,
    },

    #[error("old section {index} is deleted or moved more than once")]
    SectionSourceConflict { index: usize },

    #[error("new section {index} is targeted more than once")]
    SectionTargetConflict { index: usize },

    #[error("old row {path} is deleted or moved more than once")]
    RowSourceConflict { path: IndexPath },

    #[error("new row {path} is targeted more than once")]
    RowTargetConflict { path: IndexPath },

    #[error("reloaded section {index} does not survive the batch")]
    ReloadOfRemovedSection { index: usize },

    #[error("batch yields {found} sections, expected {expected}")]
    SectionCountMismatch { expected: usize, found: usize },

    #[error("section {section} yields {found} rows, expected {expected}")]
    RowCountMismatch {
        section: usize,
        expected: usize,
        found: usize,
    },
}

/// Where a post-batch slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<T> {
    /// Carried over from the pre-batch structure at this position.
    Kept(T),
    /// Newly inserted; content comes from the new snapshot.
    Inserted,
}

/// One section after the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedSection {
    pub origin: Slot<usize>,
    /// The section's header/footer was reloaded.
    pub reloaded: bool,
    pub rows: Vec<Slot<IndexPath>>,
}

/// Resolve `batch` against a structure with `old_rows[s]` rows in section
/// `s`, producing a structure with `new_rows[s]` rows in section `s`.
pub fn replay(
    old_rows: &[usize],
    new_rows: &[usize],
    batch: &EditBatch,
) -> Result<Vec<ReplayedSection>, ReplayError> {
    let sections = replay_sections(old_rows.len(), new_rows.len(), batch)?;

    // Row slots of every post-batch section; `None` is still open.
    let mut slots: Vec<Vec<Option<Slot<IndexPath>>>> =
        new_rows.iter().map(|&len| vec![None; len]).collect();
    let mut consumed: Vec<Vec<bool>> = old_rows.iter().map(|&len| vec![false; len]).collect();

    let mut consume = |path: IndexPath| -> Result<(), ReplayError> {
        let rows = consumed
            .get_mut(path.section)
            .ok_or(ReplayError::SectionOutOfRange {
                space: IndexSpace::Old,
                index: path.section,
                len: old_rows.len(),
            })?;
        let len = rows.len();
        let flag = rows.get_mut(path.row).ok_or(ReplayError::RowOutOfRange {
            space: IndexSpace::Old,
            path,
            len,
        })?;
        if std::mem::replace(flag, true) {
            return Err(ReplayError::RowSourceConflict { path });
        }
        Ok(())
    };

    for &path in &batch.row_deletes {
        consume(path)?;
    }
    for &(from, _) in &batch.row_moves {
        consume(from)?;
    }

    let mut place = |path: IndexPath, slot: Slot<IndexPath>| -> Result<(), ReplayError> {
        let rows = slots
            .get_mut(path.section)
            .ok_or(ReplayError::SectionOutOfRange {
                space: IndexSpace::New,
                index: path.section,
                len: new_rows.len(),
            })?;
        let len = rows.len();
        let target = rows.get_mut(path.row).ok_or(ReplayError::RowOutOfRange {
            space: IndexSpace::New,
            path,
            len,
        })?;
        if target.replace(slot).is_some() {
            return Err(ReplayError::RowTargetConflict { path });
        }
        Ok(())
    };

    for &(from, to) in &batch.row_moves {
        place(to, Slot::Kept(from))?;
    }
    for &path in &batch.row_inserts {
        place(path, Slot::Inserted)?;
    }

    sections
        .into_iter()
        .zip(slots)
        .enumerate()
        .map(|(index, ((origin, reloaded), open))| {
            let rows = match origin {
                // A surface asks its data source for every row of an
                // inserted section.
                Slot::Inserted => open
                    .into_iter()
                    .map(|slot| slot.unwrap_or(Slot::Inserted))
                    .collect(),
                Slot::Kept(old_section) => {
                    let mut survivors = consumed[old_section]
                        .iter()
                        .enumerate()
                        .filter(|(_, gone)| !**gone)
                        .map(|(row, _)| IndexPath::new(old_section, row));
                    let expected = open.len();
                    let mut rows = Vec::with_capacity(expected);
                    for slot in open {
                        match slot {
                            Some(slot) => rows.push(slot),
                            None => match survivors.next() {
                                Some(path) => rows.push(Slot::Kept(path)),
                                None => {
                                    return Err(ReplayError::RowCountMismatch {
                                        section: index,
                                        expected,
                                        found: rows.len(),
                                    });
                                }
                            },
                        }
                    }
                    let extra = survivors.count();
                    if extra > 0 {
                        return Err(ReplayError::RowCountMismatch {
                            section: index,
                            expected,
                            found: expected + extra,
                        });
                    }
                    rows
                }
            };
            Ok(ReplayedSection {
                origin,
                reloaded,
                rows,
            })
        })
        .collect()
}

/// Section-level resolution: `(origin, reloaded)` per post-batch section.
fn replay_sections(
    old_len: usize,
    new_len: usize,
    batch: &EditBatch,
) -> Result<Vec<(Slot<usize>, bool)>, ReplayError> {
    let mut consumed = vec![false; old_len];
    let mut slots: Vec<Option<Slot<usize>>> = vec![None; new_len];

    let mut consume = |index: usize| -> Result<(), ReplayError> {
        let flag = consumed.get_mut(index).ok_or(ReplayError::SectionOutOfRange {
            space: IndexSpace::Old,
            index,
            len: old_len,
        })?;
        if std::mem::replace(flag, true) {
            return Err(ReplayError::SectionSourceConflict { index });
        }
        Ok(())
    };
    for index in batch.section_deletes.iter() {
        consume(index)?;
    }
    for &(from, _) in &batch.section_moves {
        consume(from)?;
    }

    let mut place = |index: usize, slot: Slot<usize>| -> Result<(), ReplayError> {
        let target = slots.get_mut(index).ok_or(ReplayError::SectionOutOfRange {
            space: IndexSpace::New,
            index,
            len: new_len,
        })?;
        if target.replace(slot).is_some() {
            return Err(ReplayError::SectionTargetConflict { index });
        }
        Ok(())
    };
    for &(from, to) in &batch.section_moves {
        place(to, Slot::Kept(from))?;
    }
    for index in batch.section_inserts.iter() {
        place(index, Slot::Inserted)?;
    }

    let survivors = (0..old_len).filter(|&i| !consumed[i]).count();
    let placed = slots.iter().filter(|slot| slot.is_some()).count();
    if survivors + placed != new_len {
        return Err(ReplayError::SectionCountMismatch {
            expected: new_len,
            found: survivors + placed,
        });
    }

    let mut survivors = (0..old_len).filter(|&i| !consumed[i]);
    let origins: Vec<Slot<usize>> = slots
        .into_iter()
        .map(|slot| slot.or_else(|| survivors.next().map(Slot::Kept)))
        .collect::<Option<_>>()
        .ok_or(ReplayError::SectionCountMismatch {
            expected: new_len,
            found: placed,
        })?;

    for index in batch.section_reloads.iter() {
        let deleted = batch.section_deletes.contains(index);
        if index >= old_len || deleted {
            return Err(ReplayError::ReloadOfRemovedSection { index });
        }
    }

    Ok(origins
        .into_iter()
        .map(|origin| {
            let reloaded = match origin {
                Slot::Kept(old) => batch.section_reloads.contains(old),
                Slot::Inserted => false,
            };
            (origin, reloaded)
        })
        .collect())
}

/// Replay `batch` on identity outlines.
///
/// Kept slots take their identity from `old`, inserted slots from `new`.
/// For a batch computed by [`diff_snapshots`](crate::diff_snapshots) the
/// result equals `new`.
pub fn replay_outline(
    old: &Outline,
    new: &Outline,
    batch: &EditBatch,
) -> Result<Outline, ReplayError> {
    let old_rows: Vec<usize> = old.iter().map(|(_, rows)| rows.len()).collect();
    let new_rows: Vec<usize> = new.iter().map(|(_, rows)| rows.len()).collect();
    let replayed = replay(&old_rows, &new_rows, batch)?;

    Ok(replayed
        .into_iter()
        .zip(new)
        .map(|(section, (new_id, new_row_ids))| {
            let id: ItemId = match section.origin {
                Slot::Kept(old_index) => old[old_index].0.clone(),
                Slot::Inserted => new_id.clone(),
            };
            let rows = section
                .rows
                .iter()
                .zip(new_row_ids)
                .map(|(slot, new_row_id)| match slot {
                    Slot::Kept(path) => old[path.section].1[path.row].clone(),
                    Slot::Inserted => new_row_id.clone(),
                })
                .collect();
            (id, rows)
        })
        .collect())
}
