#![forbid(unsafe_code)]

//! The application side of the table.
//!
//! The table never owns its data source. The owner registers it and the
//! table holds a [`Weak`] handle; once the owner drops it, reloads build
//! empty snapshots and events go nowhere.

use std::rc::Weak;

use flist_core::Section;

/// Builds snapshots and receives forwarded surface events.
///
/// Callbacks run synchronously on the reconciliation path. They must not
/// start another reload of the same table.
pub trait SectionsDataSource<V> {
    /// Produce the desired sections. Must not touch the table.
    fn build_sections(&self) -> Vec<Section<V>>;

    /// A bound visual is about to be reused or rebound.
    fn unbind(&self, _visual: &V) {}

    /// A paginating section is close to its end.
    fn on_bottom_reached(&self) {}

    /// The user scrolled (dragging, not decelerating).
    fn user_did_scroll(&self) {}

    /// Any scroll, user-driven or not.
    fn did_scroll(&self) {}

    fn user_will_drag(&self) {}
}

pub type WeakDataSource<V> = Weak<dyn SectionsDataSource<V>>;
