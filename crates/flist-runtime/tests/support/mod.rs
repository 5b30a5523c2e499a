#![allow(dead_code)]

//! Shared fixtures: a surface that records every call into a journal and a
//! data source that writes its callbacks into the same journal.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use flist_core::{IndexPath, IndexSet, ReuseKey, Row, Section, Visual};
use flist_runtime::{RenderSurface, RowAnimation, SectionsDataSource};

pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

// ============================================================================
// Visual
// ============================================================================

#[derive(Clone)]
pub struct FakeCell {
    pub id: u32,
    pub journal: Journal,
}

impl Visual for FakeCell {
    fn same_visual(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn set_background(&self, _color: flist_core::Rgba) {
        self.journal.borrow_mut().push(format!("v{}.background", self.id));
    }

    fn bind_label(&self, text: &str, _top_margin: f64) {
        self.journal
            .borrow_mut()
            .push(format!("v{}.label:{text}", self.id));
    }

    fn start_activity(&self) {
        self.journal.borrow_mut().push(format!("v{}.spinner", self.id));
    }
}

// ============================================================================
// Surface
// ============================================================================

pub struct RecordingSurface {
    pub journal: Journal,
    pub registered: HashSet<String>,
    pub bound: HashMap<IndexPath, FakeCell>,
    pub visible: Vec<IndexPath>,
    pub width: f64,
    next_id: Cell<u32>,
}

impl RecordingSurface {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
            registered: ["cell", ReuseKey::LABEL, ReuseKey::SPINNER, ReuseKey::COLOR]
                .into_iter()
                .map(String::from)
                .collect(),
            bound: HashMap::new(),
            visible: Vec::new(),
            width: 320.0,
            next_id: Cell::new(1),
        }
    }

    pub fn make_visual(&self) -> FakeCell {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        FakeCell {
            id,
            journal: Rc::clone(&self.journal),
        }
    }

    /// Pretend `path` is on screen with a fresh visual.
    pub fn bind_at(&mut self, path: IndexPath) -> FakeCell {
        let visual = self.make_visual();
        self.bound.insert(path, visual.clone());
        visual
    }

    fn log(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }
}

pub fn fmt_set(set: &IndexSet) -> String {
    format!("{:?}", set.as_slice())
}

pub fn fmt_paths(paths: &[IndexPath]) -> String {
    paths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl RenderSurface for RecordingSurface {
    type Visual = FakeCell;

    fn begin_updates(&mut self) {
        self.log("begin".into());
    }

    fn end_updates(&mut self) {
        self.log("end".into());
    }

    fn insert_sections(&mut self, sections: &IndexSet, _animation: RowAnimation) {
        self.log(format!("insert_sections {}", fmt_set(sections)));
    }

    fn delete_sections(&mut self, sections: &IndexSet, _animation: RowAnimation) {
        self.log(format!("delete_sections {}", fmt_set(sections)));
    }

    fn reload_sections(&mut self, sections: &IndexSet, _animation: RowAnimation) {
        self.log(format!("reload_sections {}", fmt_set(sections)));
    }

    fn move_section(&mut self, from: usize, to: usize) {
        self.log(format!("move_section {from}->{to}"));
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.log(format!("move_row {from}->{to}"));
    }

    fn insert_rows(&mut self, paths: &[IndexPath], _animation: RowAnimation) {
        self.log(format!("insert_rows {}", fmt_paths(paths)));
    }

    fn delete_rows(&mut self, paths: &[IndexPath], _animation: RowAnimation) {
        self.log(format!("delete_rows {}", fmt_paths(paths)));
    }

    fn reload_data(&mut self) {
        self.bound.clear();
        self.log("reload_data".into());
    }

    fn visual_at(&self, path: IndexPath) -> Option<FakeCell> {
        self.bound.get(&path).cloned()
    }

    fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.visible.clone()
    }

    fn dequeue_visual(&mut self, reuse_key: &ReuseKey, _path: IndexPath) -> Option<FakeCell> {
        self.registered
            .contains(reuse_key.as_str())
            .then(|| self.make_visual())
    }

    fn dequeue_header_footer(&mut self, reuse_key: &ReuseKey) -> Option<FakeCell> {
        self.registered
            .contains(reuse_key.as_str())
            .then(|| self.make_visual())
    }

    fn placeholder_visual(&mut self) -> FakeCell {
        self.log("placeholder".into());
        FakeCell {
            id: 0,
            journal: Rc::clone(&self.journal),
        }
    }

    fn deselect_row(&mut self, path: IndexPath, animated: bool) {
        self.log(format!("deselect {path} animated={animated}"));
    }

    fn container_width(&self) -> f64 {
        self.width
    }
}

// ============================================================================
// Data source
// ============================================================================

pub struct RecordingSource {
    pub journal: Journal,
    pub sections: RefCell<Vec<Section<FakeCell>>>,
}

impl RecordingSource {
    pub fn new(journal: &Journal) -> Rc<Self> {
        Rc::new(Self {
            journal: Rc::clone(journal),
            sections: RefCell::new(Vec::new()),
        })
    }

    pub fn set(&self, sections: Vec<Section<FakeCell>>) {
        *self.sections.borrow_mut() = sections;
    }
}

impl SectionsDataSource<FakeCell> for RecordingSource {
    fn build_sections(&self) -> Vec<Section<FakeCell>> {
        self.sections.borrow().clone()
    }

    fn unbind(&self, visual: &FakeCell) {
        self.journal
            .borrow_mut()
            .push(format!("unbind v{}", visual.id));
    }

    fn on_bottom_reached(&self) {
        self.journal.borrow_mut().push("bottom_reached".into());
    }

    fn user_did_scroll(&self) {
        self.journal.borrow_mut().push("user_did_scroll".into());
    }

    fn did_scroll(&self) {
        self.journal.borrow_mut().push("did_scroll".into());
    }

    fn user_will_drag(&self) {
        self.journal.borrow_mut().push("user_will_drag".into());
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Dynamic "cell" row whose binder journals `bind <id>@<version> animated=<b>`.
pub fn row(id: &str, version: &str) -> Row<FakeCell> {
    let label = format!("{id}@{version}");
    Row::new(id, "cell")
        .content_version(version)
        .on_bind(move |visual: &FakeCell, animated| {
            visual
                .journal
                .borrow_mut()
                .push(format!("bind {label} animated={animated}"));
        })
}

pub fn section(id: &str, rows: &[(&str, &str)]) -> Section<FakeCell> {
    Section::new(id).rows(rows.iter().map(|(id, v)| row(id, v)))
}
