#![forbid(unsafe_code)]

//! Core: item identities, the sectioned-list data model, and the pagination trigger.

pub mod action;
pub mod color;
pub mod header;
pub mod identity;
pub mod index;
pub mod measure;
pub mod pagination;
pub mod row;
pub mod section;
pub mod snapshot;
pub mod visual;

pub use action::{ActionPattern, RowAction};
pub use color::Rgba;
pub use header::{CustomHeader, HeaderFooter, HeaderMetrics};
pub use identity::{ContentVersion, Identified, ItemId, SectionState, content_changed, same_identity};
pub use index::{IndexPath, IndexSet};
pub use measure::{MonospaceMeasure, TextMeasure};
pub use pagination::{
    DEFAULT_PAGINATION_THRESHOLD, should_trigger_bottom_reached, should_trigger_bottom_reached_with,
};
pub use row::{DEFAULT_ROW_HEIGHT, HeightFn, Row, RowKind};
pub use section::Section;
pub use snapshot::{Outline, Snapshot};
pub use visual::{Insets, ReuseKey, Visual};
