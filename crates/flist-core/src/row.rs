#![forbid(unsafe_code)]

//! Row records.
//!
//! Rows are immutable values from the reconciler's point of view: changing
//! a row means emitting a different row (same id, new content version) in
//! the next snapshot. Behaviour travels with the row as shared closures, so
//! cloning a row is cheap and never duplicates user state.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::action::RowAction;
use crate::color::Rgba;
use crate::identity::{ContentVersion, Identified, ItemId};
use crate::visual::{Insets, ReuseKey, Visual};

/// Height used when a row does not specify one.
pub const DEFAULT_ROW_HEIGHT: f64 = 44.0;

/// Height as a function of container width.
pub type HeightFn = Rc<dyn Fn(f64) -> f64>;

type BindFn<V> = Rc<dyn Fn(&V, bool)>;
type VisualFn<V> = Rc<dyn Fn(&V)>;
type ActionsFn<V> = Rc<dyn Fn() -> Vec<RowAction<V>>>;

/// Where a row's visual comes from.
pub enum RowKind<V> {
    /// Dequeued from the surface by reuse key; `prepare` runs on every dequeue.
    Dynamic {
        reuse_key: ReuseKey,
        prepare: Option<VisualFn<V>>,
    },
    /// A pre-built visual handed to the surface as-is.
    Fixed {
        visual: V,
        on_ready: Option<Rc<dyn Fn()>>,
        ready_reported: Rc<Cell<bool>>,
    },
}

impl<V: Clone> Clone for RowKind<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Dynamic { reuse_key, prepare } => Self::Dynamic {
                reuse_key: reuse_key.clone(),
                prepare: prepare.clone(),
            },
            Self::Fixed {
                visual,
                on_ready,
                ready_reported,
            } => Self::Fixed {
                visual: visual.clone(),
                on_ready: on_ready.clone(),
                ready_reported: Rc::clone(ready_reported),
            },
        }
    }
}

/// One row of a section.
pub struct Row<V> {
    id: ItemId,
    content_version: Option<ContentVersion>,
    height: f64,
    dynamic_height: Option<HeightFn>,
    separator_inset: Option<Insets>,
    auto_deselect: bool,
    actions: Option<ActionsFn<V>>,
    kind: RowKind<V>,
    bind: Option<BindFn<V>>,
    on_select: Option<VisualFn<V>>,
}

impl<V> Row<V> {
    /// A row whose visual is dequeued from the surface under `reuse_key`.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, reuse_key: impl Into<ReuseKey>) -> Self {
        Self::with_kind(
            id.into(),
            RowKind::Dynamic {
                reuse_key: reuse_key.into(),
                prepare: None,
            },
        )
    }

    /// A row that always presents the given pre-built visual.
    #[must_use]
    pub fn fixed(id: impl Into<ItemId>, visual: V) -> Self {
        Self::with_kind(
            id.into(),
            RowKind::Fixed {
                visual,
                on_ready: None,
                ready_reported: Rc::new(Cell::new(false)),
            },
        )
    }

    fn with_kind(id: ItemId, kind: RowKind<V>) -> Self {
        Self {
            id,
            content_version: None,
            height: DEFAULT_ROW_HEIGHT,
            dynamic_height: None,
            separator_inset: None,
            auto_deselect: false,
            actions: None,
            kind,
            bind: None,
            on_select: None,
        }
    }

    #[must_use]
    pub fn content_version(mut self, version: impl Into<ContentVersion>) -> Self {
        self.content_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Height computed from the container width; overrides the fixed height.
    #[must_use]
    pub fn dynamic_height(mut self, height: impl Fn(f64) -> f64 + 'static) -> Self {
        self.dynamic_height = Some(Rc::new(height));
        self
    }

    #[must_use]
    pub fn separator_inset(mut self, inset: Insets) -> Self {
        self.separator_inset = Some(inset);
        self
    }

    #[must_use]
    pub fn auto_deselect(mut self, auto_deselect: bool) -> Self {
        self.auto_deselect = auto_deselect;
        self
    }

    /// Trailing swipe actions, built lazily when the user starts swiping.
    #[must_use]
    pub fn actions(mut self, provider: impl Fn() -> Vec<RowAction<V>> + 'static) -> Self {
        self.actions = Some(Rc::new(provider));
        self
    }

    /// Runs on every dequeue of a dynamic row's visual. Ignored for fixed rows.
    #[must_use]
    pub fn prepare(mut self, prepare: impl Fn(&V) + 'static) -> Self {
        if let RowKind::Dynamic { prepare: slot, .. } = &mut self.kind {
            *slot = Some(Rc::new(prepare));
        }
        self
    }

    /// Content binder: `(visual, animated)`.
    #[must_use]
    pub fn on_bind(mut self, bind: impl Fn(&V, bool) + 'static) -> Self {
        self.bind = Some(Rc::new(bind));
        self
    }

    #[must_use]
    pub fn on_select(mut self, on_select: impl Fn(&V) + 'static) -> Self {
        self.on_select = Some(Rc::new(on_select));
        self
    }

    /// Fires once, on the first bind of a fixed row. Ignored for dynamic rows.
    #[must_use]
    pub fn on_ready(mut self, on_ready: impl Fn() + 'static) -> Self {
        if let RowKind::Fixed { on_ready: slot, .. } = &mut self.kind {
            *slot = Some(Rc::new(on_ready));
        }
        self
    }

    #[must_use]
    pub fn fixed_height(&self) -> f64 {
        self.height
    }

    /// Height the surface should use for this row.
    ///
    /// A dynamic height gets the surface's separator adjustment added; a
    /// fixed height is returned untouched.
    #[must_use]
    pub fn surface_height(&self, container_width: f64, separator_height: f64) -> f64 {
        self.dynamic_height
            .as_ref()
            .map_or(self.height, |height| height(container_width) + separator_height)
    }

    #[must_use]
    pub fn is_auto_deselect(&self) -> bool {
        self.auto_deselect
    }

    #[must_use]
    pub fn kind(&self) -> &RowKind<V> {
        &self.kind
    }

    /// Reuse key of a dynamic row.
    #[must_use]
    pub fn reuse_key(&self) -> Option<&ReuseKey> {
        match &self.kind {
            RowKind::Dynamic { reuse_key, .. } => Some(reuse_key),
            RowKind::Fixed { .. } => None,
        }
    }

    #[must_use]
    pub fn has_actions(&self) -> bool {
        self.actions.is_some()
    }

    /// Build the row's swipe actions, if it has any.
    #[must_use]
    pub fn swipe_actions(&self) -> Option<Vec<RowAction<V>>> {
        self.actions.as_ref().map(|provider| provider())
    }

    /// Run the dequeue hook of a dynamic row.
    pub fn prepare_visual(&self, visual: &V) {
        if let RowKind::Dynamic {
            prepare: Some(prepare),
            ..
        } = &self.kind
        {
            prepare(visual);
        }
    }

    pub fn select(&self, visual: &V) {
        if let Some(on_select) = &self.on_select {
            on_select(visual);
        }
    }
}

impl<V: Visual> Row<V> {
    /// Spacer row with an optional background and a hidden separator.
    #[must_use]
    pub fn empty(id: impl Into<ItemId>, height: f64, background: Option<Rgba>) -> Self {
        Self::new(id, ReuseKey::EMPTY)
            .height(height)
            .separator_inset(Insets::HIDDEN_SEPARATOR)
            .on_bind(move |visual: &V, _animated| {
                if let Some(color) = background {
                    visual.set_background(color);
                }
            })
    }

    /// Bind row content to `visual`.
    ///
    /// Dynamic rows run their binder and then apply the separator inset.
    /// Fixed rows run their binder and report readiness on the first bind.
    pub fn bind_visual(&self, visual: &V, animated: bool) {
        if let Some(bind) = &self.bind {
            bind(visual, animated);
        }
        match &self.kind {
            RowKind::Dynamic { .. } => {
                if let Some(inset) = self.separator_inset {
                    visual.set_separator_inset(inset);
                }
            }
            RowKind::Fixed {
                on_ready,
                ready_reported,
                ..
            } => {
                if !ready_reported.replace(true)
                    && let Some(on_ready) = on_ready
                {
                    on_ready();
                }
            }
        }
    }
}

impl<V> Identified for Row<V> {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn content_version(&self) -> Option<&ContentVersion> {
        self.content_version.as_ref()
    }
}

impl<V: Clone> Clone for Row<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            content_version: self.content_version.clone(),
            height: self.height,
            dynamic_height: self.dynamic_height.clone(),
            separator_inset: self.separator_inset,
            auto_deselect: self.auto_deselect,
            actions: self.actions.clone(),
            kind: self.kind.clone(),
            bind: self.bind.clone(),
            on_select: self.on_select.clone(),
        }
    }
}

impl<V> fmt::Debug for Row<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            RowKind::Dynamic { reuse_key, .. } => format!("dynamic({reuse_key})"),
            RowKind::Fixed { .. } => String::from("fixed"),
        };
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("content_version", &self.content_version)
            .field("height", &self.height)
            .field("dynamic_height", &self.dynamic_height.is_some())
            .field("auto_deselect", &self.auto_deselect)
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct FakeCell {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Visual for FakeCell {
        fn same_visual(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.log, &other.log)
        }

        fn set_separator_inset(&self, inset: Insets) {
            self.log.borrow_mut().push(format!("inset:{}", inset.left));
        }

        fn set_background(&self, color: Rgba) {
            self.log.borrow_mut().push(format!("bg:{:08x}", color.0));
        }
    }

    #[test]
    fn default_height_is_44() {
        let row: Row<FakeCell> = Row::new("a", "cell");
        assert_eq!(row.fixed_height(), DEFAULT_ROW_HEIGHT);
        assert_eq!(row.surface_height(320.0, 1.0), 44.0);
    }

    #[test]
    fn dynamic_height_adds_separator() {
        let row: Row<FakeCell> = Row::new("a", "cell").dynamic_height(|w| w / 4.0);
        assert_eq!(row.surface_height(200.0, 0.5), 50.5);
    }

    #[test]
    fn bind_runs_binder_then_inset() {
        let fake = FakeCell::default();
        let row = Row::new("a", "cell")
            .separator_inset(Insets::new(0.0, 16.0, 0.0, 0.0))
            .on_bind(|v: &FakeCell, animated| {
                v.log.borrow_mut().push(format!("bind:{animated}"));
            });
        row.bind_visual(&fake, true);
        assert_eq!(*fake.log.borrow(), vec!["bind:true", "inset:16"]);
    }

    #[test]
    fn fixed_row_reports_ready_once_across_clones() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let fake = FakeCell::default();
        let row = Row::fixed("static", fake.clone()).on_ready(move || counter.set(counter.get() + 1));
        let copy = row.clone();
        row.bind_visual(&fake, false);
        copy.bind_visual(&fake, false);
        row.bind_visual(&fake, true);
        assert_eq!(fired.get(), 1);
        assert!(row.reuse_key().is_none());
    }

    #[test]
    fn empty_row_paints_background_and_hides_separator() {
        let fake = FakeCell::default();
        let row = Row::empty("gap", 12.0, Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(row.fixed_height(), 12.0);
        assert_eq!(row.reuse_key().map(ReuseKey::as_str), Some(ReuseKey::EMPTY));
        row.bind_visual(&fake, false);
        assert_eq!(*fake.log.borrow(), vec!["bg:010203ff", "inset:10000"]);
    }

    #[test]
    fn swipe_actions_are_built_on_demand() {
        use crate::action::ActionPattern;
        let row: Row<FakeCell> = Row::new("a", "cell").actions(|| {
            vec![RowAction::new(
                ActionPattern::Icon {
                    icon: Some("trash".into()),
                    background: Rgba::rgb(200, 0, 0),
                },
                |_| {},
            )]
        });
        assert!(row.has_actions());
        assert_eq!(row.swipe_actions().map(|a| a.len()), Some(1));
    }
}
