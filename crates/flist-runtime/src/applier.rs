#![forbid(unsafe_code)]

//! Applies an [`EditBatch`] to a [`RenderSurface`].
//!
//! # Order
//!
//! 1. Content reloads, against visuals still bound at their old paths.
//! 2. One structural transaction: section inserts, deletes, reloads and
//!    moves, then row moves, inserts and deletes.
//! 3. Inside the transaction, right after row deletes, the pagination
//!    trigger is re-evaluated for every deleted path against the new
//!    snapshot.
//!
//! A batch without structural edits never opens a transaction.

use flist_core::{Snapshot, should_trigger_bottom_reached_with};
use flist_diff::EditBatch;

use crate::config::ReconcilerConfig;
use crate::data_source::SectionsDataSource;
use crate::surface::RenderSurface;

/// What applying a batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Content reloads that found a bound visual and rebound it.
    pub rebound: usize,
    /// Whether a structural transaction was issued.
    pub transaction: bool,
    /// `on_bottom_reached` calls made after row deletes.
    pub bottom_reached: usize,
}

/// Rebind content-changed rows that are currently on screen.
///
/// Rows that are not bound are skipped; they bind fresh when they appear.
pub fn rebind_content<S: RenderSurface>(
    surface: &S,
    batch: &EditBatch,
    new: &Snapshot<S::Visual>,
    data_source: Option<&dyn SectionsDataSource<S::Visual>>,
    animated: bool,
) -> usize {
    let mut rebound = 0;
    for reload in &batch.content_reloads {
        let Some(visual) = surface.visual_at(reload.old) else {
            continue;
        };
        let Some(row) = new.row(reload.new) else {
            continue;
        };
        if let Some(data_source) = data_source {
            data_source.unbind(&visual);
        }
        row.bind_visual(&visual, animated);
        rebound += 1;
    }
    rebound
}

/// Issue the structural part of `batch` as one transaction.
///
/// Returns the number of `on_bottom_reached` calls made.
pub fn apply_structural<S: RenderSurface>(
    surface: &mut S,
    batch: &EditBatch,
    new: &Snapshot<S::Visual>,
    data_source: Option<&dyn SectionsDataSource<S::Visual>>,
    config: &ReconcilerConfig,
) -> usize {
    let animations = &config.animations;
    let mut bottom_reached = 0;

    surface.begin_updates();
    if !batch.section_inserts.is_empty() {
        surface.insert_sections(&batch.section_inserts, animations.section_insert);
    }
    if !batch.section_deletes.is_empty() {
        surface.delete_sections(&batch.section_deletes, animations.section_delete);
    }
    if !batch.section_reloads.is_empty() {
        surface.reload_sections(&batch.section_reloads, animations.section_reload);
    }
    for &(from, to) in &batch.section_moves {
        surface.move_section(from, to);
    }
    for &(from, to) in &batch.row_moves {
        surface.move_row(from, to);
    }
    if !batch.row_inserts.is_empty() {
        surface.insert_rows(&batch.row_inserts, animations.row_insert);
    }
    if !batch.row_deletes.is_empty() {
        surface.delete_rows(&batch.row_deletes, animations.row_delete);
        for path in &batch.row_deletes {
            // Deleted paths are old-space; the section may be gone or shorter.
            let Some(section) = new.section(path.section) else {
                continue;
            };
            if should_trigger_bottom_reached_with(
                config.pagination_threshold,
                section.is_paginating(),
                path.row,
                section.row_count(),
            ) && let Some(data_source) = data_source
            {
                data_source.on_bottom_reached();
                bottom_reached += 1;
            }
        }
    }
    surface.end_updates();
    bottom_reached
}

/// Apply `batch` in full: content reloads first, then the transaction.
pub fn apply<S: RenderSurface>(
    surface: &mut S,
    batch: &EditBatch,
    new: &Snapshot<S::Visual>,
    data_source: Option<&dyn SectionsDataSource<S::Visual>>,
    config: &ReconcilerConfig,
) -> ApplyOutcome {
    let rebound = rebind_content(
        surface,
        batch,
        new,
        data_source,
        config.animate_content_reloads,
    );
    if !batch.has_structural_edits() {
        return ApplyOutcome {
            rebound,
            ..ApplyOutcome::default()
        };
    }
    let bottom_reached = apply_structural(surface, batch, new, data_source, config);
    ApplyOutcome {
        rebound,
        transaction: true,
        bottom_reached,
    }
}
