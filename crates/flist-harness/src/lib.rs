#![forbid(unsafe_code)]

//! Test harness for frankenlist.
//!
//! - [`surface`]: [`SimulatedSurface`], a batch-updating list widget kept in
//!   memory, with an op log and protocol checks.
//! - [`driver`]: [`TableHarness`], which wires a table, the simulated
//!   surface and a scripted data source together and runs the host's
//!   layout and display passes.
//! - [`trace`]: JSON-lines batch traces for postmortem comparison.

pub mod driver;
pub mod surface;
pub mod trace;

pub use driver::{HarnessError, LayoutReport, ScriptedSource, TableHarness};
pub use surface::{PLACEHOLDER_KEY, Resolved, SimVisual, SimulatedSurface, SurfaceOp};
pub use trace::{TraceRecorder, outline_checksum};
