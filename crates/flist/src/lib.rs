#![forbid(unsafe_code)]

//! FrankenList public facade crate.
//!
//! Re-exports the data model, the reconcilers and (with the default
//! `runtime` feature) the surface adapter under one roof.

pub use flist_core as core;
pub use flist_diff as diff;
#[cfg(feature = "runtime")]
pub use flist_runtime as runtime;

pub mod prelude {
    pub use flist_core::{
        HeaderFooter, IndexPath, IndexSet, ItemId, ReuseKey, Row, Section, Snapshot, Visual,
        should_trigger_bottom_reached,
    };
    pub use flist_diff::{EditBatch, diff_snapshots};
    #[cfg(feature = "runtime")]
    pub use flist_runtime::{
        ReconcileReport, Reconciler, ReconcilerConfig, RenderSurface, RowAnimation,
        SectionsDataSource, SectionsTable,
    };
}
