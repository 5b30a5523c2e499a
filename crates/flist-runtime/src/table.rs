#![forbid(unsafe_code)]

//! `SectionsTable`: the adapter between a rendering surface, the retained
//! snapshot and the application's data source.
//!
//! The host forwards surface callbacks (counts, heights, visual requests,
//! display and selection events, scrolling) to the table; the table answers
//! from the retained snapshot and forwards events to the data source.
//!
//! # Failure modes
//!
//! Out-of-range index paths return [`TableError`]. An unregistered reuse key
//! is logged and answered with the surface's placeholder visual (rows) or
//! no view (headers and footers); it never aborts a pass.

use std::rc::{Rc, Weak};

use flist_core::{
    HeaderFooter, HeaderMetrics, IndexPath, MonospaceMeasure, Row, RowKind, Section, Snapshot,
    TextMeasure, should_trigger_bottom_reached_with,
};

use crate::config::ReconcilerConfig;
use crate::data_source::{SectionsDataSource, WeakDataSource};
use crate::error::{Result, TableError};
use crate::reconciler::{ReconcileReport, Reconciler};
use crate::surface::RenderSurface;
use crate::swipe::SwipeActions;

/// A sectioned list bound to one rendering surface.
pub struct SectionsTable<S: RenderSurface> {
    surface: S,
    reconciler: Reconciler<S::Visual>,
    data_source: Option<WeakDataSource<S::Visual>>,
    measure: Box<dyn TextMeasure>,
}

impl<S: RenderSurface> SectionsTable<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, ReconcilerConfig::default())
    }

    #[must_use]
    pub fn with_config(surface: S, config: ReconcilerConfig) -> Self {
        Self {
            surface,
            reconciler: Reconciler::new(config),
            data_source: None,
            measure: Box::new(MonospaceMeasure::default()),
        }
    }

    /// Text measurement used for text headers and footers.
    #[must_use]
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Register the data source. The table keeps only a weak handle.
    pub fn set_data_source<D>(&mut self, data_source: &Rc<D>)
    where
        D: SectionsDataSource<S::Visual> + 'static,
    {
        let weak: Weak<D> = Rc::downgrade(data_source);
        self.data_source = Some(weak);
    }

    pub fn clear_data_source(&mut self) {
        self.data_source = None;
    }

    /// The data source, if still alive.
    #[must_use]
    pub fn data_source(&self) -> Option<Rc<dyn SectionsDataSource<S::Visual>>> {
        self.data_source.as_ref().and_then(Weak::upgrade)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        self.reconciler.config()
    }

    /// The currently applied snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot<S::Visual> {
        self.reconciler.snapshot()
    }

    /// Animated passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.reconciler.passes()
    }

    // ── Counts and heights ──────────────────────────────────────────────

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.snapshot().section_count()
    }

    pub fn row_count(&self, section: usize) -> Result<usize> {
        self.snapshot()
            .row_count(section)
            .ok_or(TableError::SectionOutOfRange { section })
    }

    /// Dynamic heights get the configured separator adjustment; fixed
    /// heights are returned as-is.
    pub fn row_height(&self, path: IndexPath) -> Result<f64> {
        let row = self.row(path)?;
        Ok(row.surface_height(
            self.surface.container_width(),
            self.config().separator_height,
        ))
    }

    pub fn header_height(&self, section: usize) -> Result<f64> {
        let section = self.section(section)?;
        Ok(self.header_footer_height(section.header_state()))
    }

    pub fn footer_height(&self, section: usize) -> Result<f64> {
        let section = self.section(section)?;
        Ok(self.header_footer_height(section.footer_state()))
    }

    fn header_footer_height(&self, state: &HeaderFooter<S::Visual>) -> f64 {
        let config = self.config();
        let metrics = HeaderMetrics {
            measure: self.measure.as_ref(),
            spinner_height: config.spinner_height,
            text_horizontal_margin: config.text_horizontal_margin,
        };
        state.height(self.surface.container_width(), &metrics)
    }

    // ── Visuals ─────────────────────────────────────────────────────────

    pub fn header_view(&mut self, section: usize) -> Result<Option<S::Visual>> {
        let state = self.section(section)?.header_state().clone();
        Ok(self.resolve_header_footer(&state, section))
    }

    pub fn footer_view(&mut self, section: usize) -> Result<Option<S::Visual>> {
        let state = self.section(section)?.footer_state().clone();
        Ok(self.resolve_header_footer(&state, section))
    }

    fn resolve_header_footer(
        &mut self,
        state: &HeaderFooter<S::Visual>,
        section: usize,
    ) -> Option<S::Visual> {
        if let HeaderFooter::Fixed { visual, .. } = state {
            return Some(visual.clone());
        }
        let reuse_key = state.reuse_key()?;
        let Some(visual) = self.surface.dequeue_header_footer(&reuse_key) else {
            let err = TableError::missing_provider(&reuse_key);
            tracing::warn!(
                message = "flist.missing_provider",
                kind = "header_footer",
                section,
                error = %err,
            );
            return None;
        };
        state.bind_visual(&visual);
        Some(visual)
    }

    /// Visual for the row at `path`.
    ///
    /// Evaluates the pagination trigger once the row is known to exist.
    /// Dynamic rows dequeue by reuse key and run their `prepare` hook; fixed
    /// rows hand out their own visual. An unregistered key yields the
    /// placeholder visual.
    pub fn visual_for_row(&mut self, path: IndexPath) -> Result<S::Visual> {
        let row = self.row(path)?.clone();
        self.trigger_bottom_reached_at(path);
        match row.kind() {
            RowKind::Fixed { visual, .. } => Ok(visual.clone()),
            RowKind::Dynamic { reuse_key, .. } => {
                match self.surface.dequeue_visual(reuse_key, path) {
                    Some(visual) => {
                        row.prepare_visual(&visual);
                        Ok(visual)
                    }
                    None => {
                        let err = TableError::missing_provider(reuse_key);
                        tracing::warn!(
                            message = "flist.missing_provider",
                            kind = "row",
                            section = path.section,
                            row = path.row,
                            error = %err,
                        );
                        Ok(self.surface.placeholder_visual())
                    }
                }
            }
        }
    }

    /// The surface is about to show `visual` at `path`: bind without
    /// animation.
    pub fn will_display(&self, visual: &S::Visual, path: IndexPath) -> Result<()> {
        self.row(path)?.bind_visual(visual, false);
        Ok(())
    }

    /// `visual` left the screen.
    pub fn did_end_displaying(&self, visual: &S::Visual) {
        if let Some(data_source) = self.data_source() {
            data_source.unbind(visual);
        }
    }

    /// The user selected the row at `path`.
    pub fn did_select(&mut self, path: IndexPath) -> Result<()> {
        let row = self.row(path)?.clone();
        if row.is_auto_deselect() {
            self.surface.deselect_row(path, true);
        }
        if let Some(visual) = self.surface.visual_at(path) {
            row.select(&visual);
        }
        Ok(())
    }

    /// Trailing swipe actions for the row at `path`.
    #[must_use]
    pub fn trailing_swipe_actions(&self, path: IndexPath) -> Option<SwipeActions<S::Visual>> {
        let actions = self.snapshot().row(path)?.swipe_actions()?;
        Some(SwipeActions::new(actions, self.surface.visual_at(path)))
    }

    // ── Scrolling and pagination ────────────────────────────────────────

    pub fn did_scroll(&self, is_dragging: bool, is_decelerating: bool) {
        let Some(data_source) = self.data_source() else {
            return;
        };
        data_source.did_scroll();
        if is_dragging && !is_decelerating {
            data_source.user_did_scroll();
        }
    }

    pub fn will_begin_dragging(&self) {
        if let Some(data_source) = self.data_source() {
            data_source.user_will_drag();
        }
    }

    /// Evaluate the pagination trigger for every visible row.
    ///
    /// Returns how many times `on_bottom_reached` fired.
    pub fn trigger_bottom_reached_if_required(&self) -> usize {
        self.surface
            .visible_index_paths()
            .into_iter()
            .filter(|path| self.trigger_bottom_reached_at(*path))
            .count()
    }

    fn trigger_bottom_reached_at(&self, path: IndexPath) -> bool {
        let Some(section) = self.snapshot().section(path.section) else {
            return false;
        };
        if !should_trigger_bottom_reached_with(
            self.config().pagination_threshold,
            section.is_paginating(),
            path.row,
            section.row_count(),
        ) {
            return false;
        }
        match self.data_source() {
            Some(data_source) => {
                data_source.on_bottom_reached();
                true
            }
            None => false,
        }
    }

    // ── Reloading ───────────────────────────────────────────────────────

    /// Ask the data source for a fresh snapshot.
    ///
    /// A missing data source yields an empty snapshot.
    #[must_use]
    pub fn build_sections(&self) -> Snapshot<S::Visual> {
        match self.data_source() {
            Some(data_source) => Snapshot::new(data_source.build_sections()),
            None => {
                tracing::debug!(
                    message = "flist.build_sections",
                    error = %TableError::NoDataSource,
                );
                Snapshot::empty()
            }
        }
    }

    /// Rebuild from the data source.
    ///
    /// Animated reloads reconcile against the applied snapshot and return
    /// the pass report; non-animated reloads replace everything and have
    /// the surface re-query.
    pub fn reload(&mut self, animated: bool) -> Option<ReconcileReport> {
        let snapshot = self.build_sections();
        if !animated {
            self.reconciler.replace(&mut self.surface, snapshot);
            return None;
        }
        let data_source = self.data_source();
        Some(
            self.reconciler
                .reconcile(&mut self.surface, snapshot, data_source.as_deref()),
        )
    }

    /// Reconcile against an explicitly provided section list.
    pub fn apply_sections(&mut self, sections: Vec<Section<S::Visual>>) -> ReconcileReport {
        let data_source = self.data_source();
        self.reconciler.reconcile(
            &mut self.surface,
            Snapshot::new(sections),
            data_source.as_deref(),
        )
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    fn section(&self, section: usize) -> Result<&Section<S::Visual>> {
        self.snapshot()
            .section(section)
            .ok_or(TableError::SectionOutOfRange { section })
    }

    /// Row at `path` in the applied snapshot.
    pub fn row(&self, path: IndexPath) -> Result<&Row<S::Visual>> {
        self.snapshot()
            .row(path)
            .ok_or_else(|| TableError::out_of_range(path))
    }
}
