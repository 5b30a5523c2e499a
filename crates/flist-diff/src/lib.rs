#![forbid(unsafe_code)]

//! Reconciliation kernel for sectioned lists.
//!
//! Given the previously applied section list and a freshly built one, the
//! kernel computes the structural edits that turn the first into the
//! second, in the index spaces a batch-updating list surface expects:
//!
//! - [`matching`]: greedy, first-unclaimed identity matching.
//! - [`row_diff`]: per-section row moves, inserts, deletes and reloads.
//! - [`section_diff`]: section inserts, deletes, moves and header/footer
//!   reloads, delegating survivors to the row reconciler.
//! - [`batch`]: the flattened, ordered [`EditBatch`].
//! - [`replay`]: a structural model of how a surface resolves a batch,
//!   used to validate batches without a real widget.
//!
//! Everything here is pure and total over its input. Applying a batch to a
//! real surface lives in `flist-runtime`.

pub mod batch;
pub mod matching;
pub mod replay;
pub mod row_diff;
pub mod section_diff;

pub use batch::{ContentReload, EditBatch, EditKinds, EditStats, diff_snapshots};
pub use matching::Matching;
pub use replay::{IndexSpace, ReplayError, ReplayedSection, Slot, replay, replay_outline};
pub use row_diff::{RowEdits, diff_rows};
pub use section_diff::{SectionEdits, SectionMatch, diff_sections};
