#![forbid(unsafe_code)]

//! Runtime for sectioned lists: the reconciler, the batch applier and the
//! [`SectionsTable`] adapter.
//!
//! # Role in the stack
//! `flist-core` defines the model, `flist-diff` computes edit batches, and
//! this crate applies them to a [`RenderSurface`] in the order a
//! batch-updating surface accepts:
//!
//! ```text
//! data source ── build_sections ──► Snapshot ──► diff_snapshots ──► EditBatch
//!                                                                      │
//!        content reloads (old paths) ◄────────────────────────────────┤
//!        begin_updates / structural edits / end_updates ◄─────────────┘
//! ```
//!
//! # Logging
//! Passes run inside a `flist.reconcile` debug span. Unresolvable reuse
//! keys log `flist.missing_provider` at warn.

pub mod applier;
pub mod config;
pub mod data_source;
pub mod error;
pub mod reconciler;
pub mod surface;
pub mod swipe;
pub mod table;

pub use applier::{ApplyOutcome, apply, apply_structural, rebind_content};
pub use config::{ENV_PAGINATION_THRESHOLD, ENV_SEPARATOR_HEIGHT, ReconcilerConfig, RowAnimations};
pub use data_source::{SectionsDataSource, WeakDataSource};
pub use error::{Result, TableError};
pub use reconciler::{ReconcileReport, Reconciler};
pub use surface::{RenderSurface, RowAnimation};
pub use swipe::SwipeActions;
pub use table::SectionsTable;
