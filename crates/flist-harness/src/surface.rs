#![forbid(unsafe_code)]

//! In-memory rendering surface.
//!
//! [`SimulatedSurface`] behaves like a batch-updating list widget without
//! drawing anything. It records every primitive it receives, buffers the
//! primitives of an open transaction, and resolves them with
//! [`flist_diff::replay`] when the driver lays the surface out. Bound
//! visuals follow their rows through moves; visuals of deleted rows and of
//! reloaded sections are evicted.
//!
//! # Invariants
//!
//! 1. Structural primitives outside `begin_updates`/`end_updates` are
//!    recorded as protocol violations, never applied.
//! 2. Between `end_updates` and [`SimulatedSurface::resolve`] the bound map
//!    still addresses the pre-batch structure, exactly like a real widget
//!    before its layout pass.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use flist_core::{IndexPath, IndexSet, Insets, ReuseKey, Rgba, Visual};
use flist_diff::{EditBatch, ReplayError, Slot, replay};
use flist_runtime::{RenderSurface, RowAnimation};

/// Reuse key of visuals handed out for unresolvable keys.
pub const PLACEHOLDER_KEY: &str = "placeholder";

// ============================================================================
// Visual
// ============================================================================

#[derive(Debug, Default)]
struct VisualState {
    text: Option<String>,
    label: Option<(String, f64)>,
    background: Option<Rgba>,
    separator_inset: Option<Insets>,
    animating: bool,
    binds: usize,
}

/// Handle to a simulated cell, header or footer.
///
/// Row binders write into it with [`SimVisual::set_text`]; tests read the
/// result back.
#[derive(Clone)]
pub struct SimVisual {
    id: u64,
    reuse_key: ReuseKey,
    state: Rc<RefCell<VisualState>>,
}

impl SimVisual {
    fn new(id: u64, reuse_key: ReuseKey) -> Self {
        Self {
            id,
            reuse_key,
            state: Rc::new(RefCell::new(VisualState::default())),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn reuse_key(&self) -> &ReuseKey {
        &self.reuse_key
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.reuse_key.as_str() == PLACEHOLDER_KEY
    }

    /// Content written by a row binder.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.text = Some(text.into());
        state.binds += 1;
    }

    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.state.borrow().text.clone()
    }

    /// Number of `set_text` calls since the visual was created.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.state.borrow().binds
    }

    #[must_use]
    pub fn label(&self) -> Option<(String, f64)> {
        self.state.borrow().label.clone()
    }

    #[must_use]
    pub fn background(&self) -> Option<Rgba> {
        self.state.borrow().background
    }

    #[must_use]
    pub fn separator_inset(&self) -> Option<Insets> {
        self.state.borrow().separator_inset
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.borrow().animating
    }

    fn reset(&self) {
        *self.state.borrow_mut() = VisualState::default();
    }
}

impl Visual for SimVisual {
    fn same_visual(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn set_separator_inset(&self, inset: Insets) {
        self.state.borrow_mut().separator_inset = Some(inset);
    }

    fn set_background(&self, color: Rgba) {
        self.state.borrow_mut().background = Some(color);
    }

    fn bind_label(&self, text: &str, top_margin: f64) {
        self.state.borrow_mut().label = Some((text.to_owned(), top_margin));
    }

    fn start_activity(&self) {
        self.state.borrow_mut().animating = true;
    }
}

impl fmt::Debug for SimVisual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimVisual")
            .field("id", &self.id)
            .field("reuse_key", &self.reuse_key)
            .field("text", &self.state.borrow().text)
            .finish()
    }
}

// ============================================================================
// Op log
// ============================================================================

/// One call the surface received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    BeginUpdates,
    EndUpdates,
    InsertSections(Vec<usize>, RowAnimation),
    DeleteSections(Vec<usize>, RowAnimation),
    ReloadSections(Vec<usize>, RowAnimation),
    MoveSection { from: usize, to: usize },
    MoveRow { from: IndexPath, to: IndexPath },
    InsertRows(Vec<IndexPath>, RowAnimation),
    DeleteRows(Vec<IndexPath>, RowAnimation),
    ReloadData,
    Deselect { path: IndexPath, animated: bool },
}

impl SurfaceOp {
    /// Whether the op is a structural primitive that needs a transaction.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::BeginUpdates | Self::EndUpdates | Self::ReloadData | Self::Deselect { .. }
        )
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Outcome of laying out the surface after a transaction or full reload.
#[derive(Debug, Default)]
pub struct Resolved {
    /// Visuals that lost their row and should be reported as no longer
    /// displayed.
    pub evicted: Vec<SimVisual>,
    /// Number of transactions folded into this layout.
    pub transactions: usize,
}

#[derive(Debug)]
enum Pending {
    Batch(EditBatch),
    ReloadData,
}

/// A list widget that keeps structure in memory.
#[derive(Debug)]
pub struct SimulatedSurface {
    ops: Vec<SurfaceOp>,
    violations: Vec<String>,
    row_keys: HashSet<ReuseKey>,
    header_keys: HashSet<ReuseKey>,
    open: Option<EditBatch>,
    pending: Vec<Pending>,
    transactions: usize,
    rows: Vec<usize>,
    bound: BTreeMap<IndexPath, SimVisual>,
    reuse_pool: HashMap<ReuseKey, Vec<SimVisual>>,
    next_id: u64,
    width: f64,
    scroll_offset: usize,
    viewport_rows: usize,
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSurface {
    /// An empty surface, 320 points wide, showing ten rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            violations: Vec::new(),
            row_keys: HashSet::new(),
            header_keys: HashSet::new(),
            open: None,
            pending: Vec::new(),
            transactions: 0,
            rows: Vec::new(),
            bound: BTreeMap::new(),
            reuse_pool: HashMap::new(),
            next_id: 1,
            width: 320.0,
            scroll_offset: 0,
            viewport_rows: 10,
        }
    }

    /// Register a row reuse key.
    #[must_use]
    pub fn register(mut self, reuse_key: impl Into<ReuseKey>) -> Self {
        self.row_keys.insert(reuse_key.into());
        self
    }

    /// Register a header/footer reuse key.
    #[must_use]
    pub fn register_header_footer(mut self, reuse_key: impl Into<ReuseKey>) -> Self {
        self.header_keys.insert(reuse_key.into());
        self
    }

    /// Register the label, spinner and color header/footer keys.
    #[must_use]
    pub fn with_standard_headers(self) -> Self {
        self.register_header_footer(ReuseKey::LABEL)
            .register_header_footer(ReuseKey::SPINNER)
            .register_header_footer(ReuseKey::COLOR)
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Number of rows on screen at once.
    #[must_use]
    pub fn with_viewport_rows(mut self, rows: usize) -> Self {
        self.viewport_rows = rows;
        self
    }

    // ── Inspection ──────────────────────────────────────────────────────

    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the op log.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Protocol violations seen so far.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Transactions closed so far.
    #[must_use]
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Row counts per section as laid out.
    #[must_use]
    pub fn row_counts(&self) -> &[usize] {
        &self.rows
    }

    /// Whether primitives are waiting for a layout pass.
    #[must_use]
    pub fn needs_layout(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn bound(&self) -> &BTreeMap<IndexPath, SimVisual> {
        &self.bound
    }

    // ── Scrolling ───────────────────────────────────────────────────────

    /// Scroll so that flattened row `offset` is the first on screen.
    pub fn scroll_to(&mut self, offset: usize) {
        let total: usize = self.rows.iter().sum();
        self.scroll_offset = offset.min(total.saturating_sub(1));
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Resolve buffered work against the post-batch row counts.
    ///
    /// Call once per reconciliation pass: every buffered step is resolved
    /// against `new_rows`. Kept rows carry their visual to the new path
    /// unless their section was reloaded; everything else is evicted. A
    /// full reload evicts every bound visual.
    pub fn resolve(&mut self, new_rows: &[usize]) -> Result<Resolved, ReplayError> {
        let mut resolved = Resolved::default();
        for step in std::mem::take(&mut self.pending) {
            match step {
                Pending::ReloadData => {
                    resolved
                        .evicted
                        .extend(std::mem::take(&mut self.bound).into_values());
                }
                Pending::Batch(batch) => {
                    let sections = replay(&self.rows, new_rows, &batch)?;
                    let mut previous = std::mem::take(&mut self.bound);
                    for (section_index, section) in sections.iter().enumerate() {
                        if section.reloaded {
                            continue;
                        }
                        for (row_index, slot) in section.rows.iter().enumerate() {
                            if let Slot::Kept(old) = slot
                                && let Some(visual) = previous.remove(old)
                            {
                                self.bound
                                    .insert(IndexPath::new(section_index, row_index), visual);
                            }
                        }
                    }
                    resolved.evicted.extend(previous.into_values());
                    resolved.transactions += 1;
                }
            }
            self.rows = new_rows.to_vec();
        }
        Ok(resolved)
    }

    /// Index paths that should be on screen for the current structure.
    #[must_use]
    pub fn viewport(&self) -> Vec<IndexPath> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(section, &count)| (0..count).map(move |row| IndexPath::new(section, row)))
            .skip(self.scroll_offset)
            .take(self.viewport_rows)
            .collect()
    }

    /// Bound paths that fell out of the viewport, removed from the bound map.
    pub fn detach_offscreen(&mut self) -> Vec<SimVisual> {
        let visible: HashSet<IndexPath> = self.viewport().into_iter().collect();
        let offscreen: Vec<IndexPath> = self
            .bound
            .keys()
            .filter(|path| !visible.contains(path))
            .copied()
            .collect();
        offscreen
            .into_iter()
            .filter_map(|path| self.bound.remove(&path))
            .collect()
    }

    /// Mount `visual` at `path`.
    pub fn attach(&mut self, path: IndexPath, visual: SimVisual) {
        self.bound.insert(path, visual);
    }

    /// Return an evicted visual to its reuse pool.
    pub fn recycle(&mut self, visual: SimVisual) {
        if visual.is_placeholder() || !self.row_keys.contains(visual.reuse_key()) {
            return;
        }
        visual.reset();
        self.reuse_pool
            .entry(visual.reuse_key().clone())
            .or_default()
            .push(visual);
    }

    /// A fresh visual with a surface-unique id, e.g. for fixed rows.
    pub fn create_visual(&mut self, reuse_key: impl Into<ReuseKey>) -> SimVisual {
        let id = self.next_id;
        self.next_id += 1;
        SimVisual::new(id, reuse_key.into())
    }

    fn log(&mut self, op: SurfaceOp) {
        if op.is_structural() && self.open.is_none() {
            self.violations
                .push(format!("{op:?} issued outside a transaction"));
        }
        self.ops.push(op);
    }

    fn batch(&mut self) -> Option<&mut EditBatch> {
        self.open.as_mut()
    }
}

impl RenderSurface for SimulatedSurface {
    type Visual = SimVisual;

    fn begin_updates(&mut self) {
        if self.open.is_some() {
            self.violations.push("nested begin_updates".into());
        }
        self.ops.push(SurfaceOp::BeginUpdates);
        self.open = Some(EditBatch::default());
    }

    fn end_updates(&mut self) {
        self.ops.push(SurfaceOp::EndUpdates);
        match self.open.take() {
            Some(batch) => {
                self.pending.push(Pending::Batch(batch));
                self.transactions += 1;
            }
            None => self.violations.push("end_updates without begin".into()),
        }
    }

    fn insert_sections(&mut self, sections: &IndexSet, animation: RowAnimation) {
        self.log(SurfaceOp::InsertSections(sections.as_slice().to_vec(), animation));
        if let Some(batch) = self.batch() {
            batch.section_inserts.extend(sections.iter());
        }
    }

    fn delete_sections(&mut self, sections: &IndexSet, animation: RowAnimation) {
        self.log(SurfaceOp::DeleteSections(sections.as_slice().to_vec(), animation));
        if let Some(batch) = self.batch() {
            batch.section_deletes.extend(sections.iter());
        }
    }

    fn reload_sections(&mut self, sections: &IndexSet, animation: RowAnimation) {
        self.log(SurfaceOp::ReloadSections(sections.as_slice().to_vec(), animation));
        if let Some(batch) = self.batch() {
            batch.section_reloads.extend(sections.iter());
        }
    }

    fn move_section(&mut self, from: usize, to: usize) {
        self.log(SurfaceOp::MoveSection { from, to });
        if let Some(batch) = self.batch() {
            batch.section_moves.push((from, to));
        }
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.log(SurfaceOp::MoveRow { from, to });
        if let Some(batch) = self.batch() {
            batch.row_moves.push((from, to));
        }
    }

    fn insert_rows(&mut self, paths: &[IndexPath], animation: RowAnimation) {
        self.log(SurfaceOp::InsertRows(paths.to_vec(), animation));
        if let Some(batch) = self.batch() {
            batch.row_inserts.extend_from_slice(paths);
        }
    }

    fn delete_rows(&mut self, paths: &[IndexPath], animation: RowAnimation) {
        self.log(SurfaceOp::DeleteRows(paths.to_vec(), animation));
        if let Some(batch) = self.batch() {
            batch.row_deletes.extend_from_slice(paths);
        }
    }

    fn reload_data(&mut self) {
        self.ops.push(SurfaceOp::ReloadData);
        self.pending.push(Pending::ReloadData);
    }

    fn visual_at(&self, path: IndexPath) -> Option<SimVisual> {
        self.bound.get(&path).cloned()
    }

    fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.bound.keys().copied().collect()
    }

    fn dequeue_visual(&mut self, reuse_key: &ReuseKey, _path: IndexPath) -> Option<SimVisual> {
        if !self.row_keys.contains(reuse_key) {
            return None;
        }
        if let Some(visual) = self.reuse_pool.get_mut(reuse_key).and_then(Vec::pop) {
            return Some(visual);
        }
        Some(self.create_visual(reuse_key.clone()))
    }

    fn dequeue_header_footer(&mut self, reuse_key: &ReuseKey) -> Option<SimVisual> {
        if !self.header_keys.contains(reuse_key) {
            return None;
        }
        Some(self.create_visual(reuse_key.clone()))
    }

    fn placeholder_visual(&mut self) -> SimVisual {
        self.create_visual(ReuseKey::new(PLACEHOLDER_KEY))
    }

    fn deselect_row(&mut self, path: IndexPath, animated: bool) {
        self.ops.push(SurfaceOp::Deselect { path, animated });
    }

    fn container_width(&self) -> f64 {
        self.width
    }
}
