#![forbid(unsafe_code)]

//! Pagination trigger.
//!
//! Stateless predicate deciding whether showing (or shifting) a row should
//! ask the application for the next page. Evaluated when a row becomes
//! visible and again for every deleted index path after a structural batch,
//! since a deletion can pull a row across the threshold without it ever
//! being freshly bound.

/// Rows from the bottom of a paginating section that fire the trigger.
pub const DEFAULT_PAGINATION_THRESHOLD: usize = 5;

/// True iff the section paginates and `row_index > row_count - 5`.
#[inline]
#[must_use]
pub fn should_trigger_bottom_reached(
    section_paginating: bool,
    row_index: usize,
    row_count: usize,
) -> bool {
    should_trigger_bottom_reached_with(
        DEFAULT_PAGINATION_THRESHOLD,
        section_paginating,
        row_index,
        row_count,
    )
}

/// [`should_trigger_bottom_reached`] with a configurable threshold.
///
/// `row_index > row_count - threshold`, evaluated without underflow: small
/// sections fire for every row.
#[inline]
#[must_use]
pub fn should_trigger_bottom_reached_with(
    threshold: usize,
    section_paginating: bool,
    row_index: usize,
    row_count: usize,
) -> bool {
    section_paginating && row_index.saturating_add(threshold) > row_count
}
