#![forbid(unsafe_code)]

//! The rendering-surface contract.
//!
//! A surface is a stateful, indexed list widget. It owns visuals, layout
//! and animation; the runtime only drives its structural primitives and
//! asks it for visuals.
//!
//! # Transactions
//!
//! Structural primitives are only issued between [`RenderSurface::begin_updates`]
//! and [`RenderSurface::end_updates`]. Within one transaction, deletes,
//! reloads and move sources address the structure as it was before the
//! transaction; inserts and move targets address the structure after it.
//! The surface resolves the whole transaction at `end_updates`, querying the
//! runtime for the content of inserted positions.

use flist_core::{IndexPath, IndexSet, ReuseKey, Visual};

/// Animation hint for one structural primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowAnimation {
    Fade,
    Right,
    Left,
    Top,
    Bottom,
    #[default]
    None,
    Middle,
    /// Let the surface pick.
    Automatic,
}

/// A batch-updating list widget.
pub trait RenderSurface {
    /// Handle type of the surface's cells, headers and footers.
    type Visual: Visual + 'static;

    fn begin_updates(&mut self);
    fn end_updates(&mut self);

    fn insert_sections(&mut self, sections: &IndexSet, animation: RowAnimation);
    fn delete_sections(&mut self, sections: &IndexSet, animation: RowAnimation);
    fn reload_sections(&mut self, sections: &IndexSet, animation: RowAnimation);
    fn move_section(&mut self, from: usize, to: usize);

    fn move_row(&mut self, from: IndexPath, to: IndexPath);
    fn insert_rows(&mut self, paths: &[IndexPath], animation: RowAnimation);
    fn delete_rows(&mut self, paths: &[IndexPath], animation: RowAnimation);

    /// Drop all layout and re-query every visible position.
    fn reload_data(&mut self);

    /// The visual currently bound at `path`, if that row is on screen.
    fn visual_at(&self, path: IndexPath) -> Option<Self::Visual>;

    /// Index paths of the rows currently on screen.
    fn visible_index_paths(&self) -> Vec<IndexPath>;

    /// A reusable row visual registered under `reuse_key`.
    fn dequeue_visual(&mut self, reuse_key: &ReuseKey, path: IndexPath) -> Option<Self::Visual>;

    /// A reusable header/footer visual registered under `reuse_key`.
    fn dequeue_header_footer(&mut self, reuse_key: &ReuseKey) -> Option<Self::Visual>;

    /// An inert visual used when a reuse key cannot be resolved.
    fn placeholder_visual(&mut self) -> Self::Visual;

    fn deselect_row(&mut self, path: IndexPath, animated: bool);

    /// Width rows and headers are laid out in.
    fn container_width(&self) -> f64;
}
