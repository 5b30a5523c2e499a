#![forbid(unsafe_code)]

//! Retained-state reconciler.
//!
//! Owns the currently applied snapshot. A pass diffs it against a new
//! snapshot, applies the batch and then commits the new snapshot.
//!
//! # Invariants
//!
//! 1. The retained snapshot is written only at the end of a pass, after the
//!    transaction was issued (never after animations finish).
//! 2. Passes are single-flight: every pass takes `&mut self`, so a nested
//!    pass from inside a data-source callback cannot be expressed without
//!    interior mutability, and through a `RefCell` it fails to borrow.
//! 3. An inert pass issues nothing to the surface.

use std::time::Duration;

use flist_core::{Snapshot, Visual};
use flist_diff::{EditBatch, diff_snapshots};
use web_time::Instant;

use crate::applier;
use crate::config::ReconcilerConfig;
use crate::data_source::SectionsDataSource;
use crate::surface::RenderSurface;

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// 1-based pass counter of this reconciler.
    pub pass: u64,
    pub batch: EditBatch,
    /// Content reloads applied to bound visuals.
    pub rebound: usize,
    /// Whether a structural transaction was issued.
    pub transaction: bool,
    /// `on_bottom_reached` calls made after row deletes.
    pub bottom_reached: usize,
    pub duration: Duration,
}

impl ReconcileReport {
    /// Nothing changed; the surface was not touched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.batch.is_empty()
    }
}

/// Holds the applied snapshot and runs reconciliation passes against it.
#[derive(Debug)]
pub struct Reconciler<V> {
    retained: Snapshot<V>,
    config: ReconcilerConfig,
    passes: u64,
}

impl<V> Default for Reconciler<V> {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}

impl<V> Reconciler<V> {
    #[must_use]
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            retained: Snapshot::empty(),
            config,
            passes: 0,
        }
    }

    /// The currently applied snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot<V> {
        &self.retained
    }

    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ReconcilerConfig) {
        self.config = config;
    }

    /// Animated passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl<V: Visual + 'static> Reconciler<V> {
    /// Diff `new` against the retained snapshot, apply, then commit.
    pub fn reconcile<S>(
        &mut self,
        surface: &mut S,
        new: Snapshot<V>,
        data_source: Option<&dyn SectionsDataSource<V>>,
    ) -> ReconcileReport
    where
        S: RenderSurface<Visual = V>,
    {
        self.passes += 1;
        let span = tracing::debug_span!(
            "flist.reconcile",
            pass = self.passes,
            old_sections = self.retained.section_count(),
            new_sections = new.section_count(),
            new_rows = new.total_rows(),
            edits = tracing::field::Empty,
            reconcile_duration_us = tracing::field::Empty,
        );
        let _guard = span.enter();
        let start = Instant::now();

        let batch = diff_snapshots(self.retained.sections(), new.sections());
        let outcome = if batch.is_empty() {
            tracing::debug!(message = "flist.reconcile.noop", pass = self.passes);
            applier::ApplyOutcome::default()
        } else {
            let stats = batch.stats();
            span.record("edits", stats.total() as u64);
            tracing::debug!(
                message = "flist.reconcile.apply",
                pass = self.passes,
                structural = stats.structural(),
                content_reloads = stats.content_reloads,
            );
            applier::apply(surface, &batch, &new, data_source, &self.config)
        };
        self.retained = new;

        let duration = start.elapsed();
        span.record("reconcile_duration_us", duration.as_micros() as u64);
        ReconcileReport {
            pass: self.passes,
            batch,
            rebound: outcome.rebound,
            transaction: outcome.transaction,
            bottom_reached: outcome.bottom_reached,
            duration,
        }
    }

    /// Replace the retained snapshot without diffing and have the surface
    /// re-query everything.
    pub fn replace<S>(&mut self, surface: &mut S, new: Snapshot<V>)
    where
        S: RenderSurface<Visual = V>,
    {
        tracing::debug!(
            message = "flist.reload_data",
            sections = new.section_count(),
            rows = new.total_rows(),
        );
        self.retained = new;
        surface.reload_data();
    }
}
