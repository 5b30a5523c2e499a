#![forbid(unsafe_code)]

//! Trailing swipe-action bundles handed to the surface.

use std::fmt;

use flist_core::{ActionPattern, RowAction};

/// Actions for one row, bound to the row's visual at the time of the swipe.
pub struct SwipeActions<V> {
    actions: Vec<RowAction<V>>,
    visual: Option<V>,
    /// A full swipe performs the first action.
    pub performs_first_action_with_full_swipe: bool,
}

impl<V> SwipeActions<V> {
    #[must_use]
    pub fn new(actions: Vec<RowAction<V>>, visual: Option<V>) -> Self {
        Self {
            actions,
            visual,
            performs_first_action_with_full_swipe: true,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Patterns in display order, for the surface to render.
    pub fn patterns(&self) -> impl Iterator<Item = &ActionPattern> {
        self.actions.iter().map(|action| &action.pattern)
    }

    /// Run action `index` with the captured visual. False if out of range.
    pub fn trigger(&self, index: usize) -> bool {
        let Some(action) = self.actions.get(index) else {
            return false;
        };
        action.perform(self.visual.as_ref());
        true
    }
}

impl<V> fmt::Debug for SwipeActions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeActions")
            .field("actions", &self.actions)
            .field("has_visual", &self.visual.is_some())
            .field(
                "performs_first_action_with_full_swipe",
                &self.performs_first_action_with_full_swipe,
            )
            .finish()
    }
}
