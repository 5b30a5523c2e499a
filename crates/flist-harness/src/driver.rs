#![forbid(unsafe_code)]

//! Scripted driver: a [`SectionsTable`] over a [`SimulatedSurface`], fed by
//! a [`ScriptedSource`], with a layout and display pass after every reload.
//!
//! The driver plays the host's part: after the table reconciles, it lays the
//! surface out, reports evicted visuals as no longer displayed, and asks the
//! table for visuals of every newly visible row, binding them the way a
//! real list widget would (`visual_for_row`, then `will_display`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flist_core::{IndexPath, Section};
use flist_diff::ReplayError;
use flist_runtime::{
    ReconcileReport, ReconcilerConfig, RenderSurface, SectionsDataSource, SectionsTable,
    TableError,
};
use thiserror::Error;

use crate::surface::{SimVisual, SimulatedSurface};
use crate::trace::TraceRecorder;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("surface rejected the batch: {0}")]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("trace write failed: {0}")]
    Trace(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// A data source whose sections are set by the test and whose callbacks
/// are counted.
#[derive(Default)]
pub struct ScriptedSource {
    sections: RefCell<Vec<Section<SimVisual>>>,
    builds: Cell<usize>,
    bottom_reached: Cell<usize>,
    unbound: RefCell<Vec<u64>>,
    scrolls: Cell<usize>,
    user_scrolls: Cell<usize>,
    drags: Cell<usize>,
}

impl ScriptedSource {
    pub fn set_sections(&self, sections: Vec<Section<SimVisual>>) {
        *self.sections.borrow_mut() = sections;
    }

    #[must_use]
    pub fn builds(&self) -> usize {
        self.builds.get()
    }

    #[must_use]
    pub fn bottom_reached(&self) -> usize {
        self.bottom_reached.get()
    }

    /// Ids of visuals reported through `unbind`, in order.
    #[must_use]
    pub fn unbound(&self) -> Vec<u64> {
        self.unbound.borrow().clone()
    }

    #[must_use]
    pub fn scrolls(&self) -> (usize, usize, usize) {
        (self.scrolls.get(), self.user_scrolls.get(), self.drags.get())
    }
}

impl SectionsDataSource<SimVisual> for ScriptedSource {
    fn build_sections(&self) -> Vec<Section<SimVisual>> {
        self.builds.set(self.builds.get() + 1);
        self.sections.borrow().clone()
    }

    fn unbind(&self, visual: &SimVisual) {
        self.unbound.borrow_mut().push(visual.id());
    }

    fn on_bottom_reached(&self) {
        self.bottom_reached.set(self.bottom_reached.get() + 1);
    }

    fn user_did_scroll(&self) {
        self.user_scrolls.set(self.user_scrolls.get() + 1);
    }

    fn did_scroll(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }

    fn user_will_drag(&self) {
        self.drags.set(self.drags.get() + 1);
    }
}

/// What one layout pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    /// Transactions resolved.
    pub transactions: usize,
    /// Visuals released (deleted, reloaded or scrolled away).
    pub released: usize,
    /// Rows bound fresh.
    pub displayed: usize,
}

/// Table, surface, data source and trace wired together.
pub struct TableHarness {
    table: SectionsTable<SimulatedSurface>,
    source: Rc<ScriptedSource>,
    trace: TraceRecorder<Vec<u8>>,
}

impl TableHarness {
    #[must_use]
    pub fn new(surface: SimulatedSurface) -> Self {
        Self::with_config(surface, ReconcilerConfig::default())
    }

    #[must_use]
    pub fn with_config(surface: SimulatedSurface, config: ReconcilerConfig) -> Self {
        let source = Rc::new(ScriptedSource::default());
        let mut table = SectionsTable::with_config(surface, config);
        table.set_data_source(&source);
        Self {
            table,
            source,
            trace: TraceRecorder::in_memory(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Rc<ScriptedSource> {
        &self.source
    }

    #[must_use]
    pub fn table(&self) -> &SectionsTable<SimulatedSurface> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SectionsTable<SimulatedSurface> {
        &mut self.table
    }

    #[must_use]
    pub fn surface(&self) -> &SimulatedSurface {
        self.table.surface()
    }

    pub fn surface_mut(&mut self) -> &mut SimulatedSurface {
        self.table.surface_mut()
    }

    /// Replace the data source's sections and run an animated reload.
    pub fn apply(&mut self, sections: Vec<Section<SimVisual>>) -> Result<ReconcileReport> {
        self.source.set_sections(sections);
        let report = self.reload_animated()?;
        Ok(report)
    }

    /// Animated reload followed by layout.
    pub fn reload_animated(&mut self) -> Result<ReconcileReport> {
        let report = self
            .table
            .reload(true)
            .ok_or(TableError::NoDataSource)?;
        self.trace.record_pass(&report, self.table.snapshot())?;
        tracing::debug!(
            message = "harness.pass",
            pass = report.pass,
            stats = %report.batch.stats(),
        );
        self.layout()?;
        Ok(report)
    }

    /// Full reload followed by layout.
    pub fn reload_data(&mut self) -> Result<LayoutReport> {
        self.table.reload(false);
        self.trace.record_reload(self.table.snapshot())?;
        self.layout()
    }

    /// Resolve pending surface work, then bind every newly visible row.
    pub fn layout(&mut self) -> Result<LayoutReport> {
        let counts: Vec<usize> = self
            .table
            .snapshot()
            .sections()
            .iter()
            .map(Section::row_count)
            .collect();
        let resolved = self.table.surface_mut().resolve(&counts)?;
        let mut report = LayoutReport {
            transactions: resolved.transactions,
            ..LayoutReport::default()
        };
        let offscreen = self.table.surface_mut().detach_offscreen();
        for visual in resolved.evicted.into_iter().chain(offscreen) {
            self.release(visual);
            report.released += 1;
        }
        report.displayed = self.display()?;
        Ok(report)
    }

    /// Scroll as a user drag and lay out.
    pub fn scroll_to(&mut self, offset: usize) -> Result<LayoutReport> {
        self.table.will_begin_dragging();
        self.table.surface_mut().scroll_to(offset);
        self.table.did_scroll(true, false);
        self.layout()
    }

    /// `(path, text)` of every bound row, in path order.
    #[must_use]
    pub fn visible_texts(&self) -> Vec<(IndexPath, Option<String>)> {
        self.surface()
            .bound()
            .iter()
            .map(|(path, visual)| (*path, visual.text()))
            .collect()
    }

    pub fn select(&mut self, path: IndexPath) -> Result<()> {
        self.table.did_select(path)?;
        Ok(())
    }

    /// Finish the trace and return its lines.
    pub fn finish_trace(&mut self) -> Result<Vec<String>> {
        self.trace.finish()?;
        Ok(self.trace.lines().into_iter().map(str::to_owned).collect())
    }

    fn display(&mut self) -> Result<usize> {
        let mut displayed = 0;
        for path in self.table.surface().viewport() {
            if self.table.surface().visual_at(path).is_some() {
                continue;
            }
            let visual = self.table.visual_for_row(path)?;
            self.table.will_display(&visual, path)?;
            self.table.surface_mut().attach(path, visual);
            displayed += 1;
        }
        Ok(displayed)
    }

    fn release(&mut self, visual: SimVisual) {
        self.table.did_end_displaying(&visual);
        self.table.surface_mut().recycle(visual);
    }
}
