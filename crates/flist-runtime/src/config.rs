#![forbid(unsafe_code)]

//! Reconciler configuration.
//!
//! Defaults match the behaviour of a stock sectioned table: a five-row
//! pagination window, a 50pt spinner, 32pt of horizontal text margin and
//! no separator adjustment.
//!
//! Environment overrides:
//!
//! | Variable                      | Field                  |
//! |-------------------------------|------------------------|
//! | `FLIST_PAGINATION_THRESHOLD`  | `pagination_threshold` |
//! | `FLIST_SEPARATOR_HEIGHT`      | `separator_height`     |

use flist_core::DEFAULT_PAGINATION_THRESHOLD;

use crate::error::{Result, TableError};
use crate::surface::RowAnimation;

pub const ENV_PAGINATION_THRESHOLD: &str = "FLIST_PAGINATION_THRESHOLD";
pub const ENV_SEPARATOR_HEIGHT: &str = "FLIST_SEPARATOR_HEIGHT";

/// Animation hints per structural primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAnimations {
    pub section_insert: RowAnimation,
    pub section_delete: RowAnimation,
    pub section_reload: RowAnimation,
    pub row_insert: RowAnimation,
    pub row_delete: RowAnimation,
}

impl Default for RowAnimations {
    fn default() -> Self {
        Self {
            section_insert: RowAnimation::Top,
            section_delete: RowAnimation::None,
            section_reload: RowAnimation::Automatic,
            row_insert: RowAnimation::Top,
            row_delete: RowAnimation::Fade,
        }
    }
}

impl RowAnimations {
    /// Every primitive without animation.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            section_insert: RowAnimation::None,
            section_delete: RowAnimation::None,
            section_reload: RowAnimation::None,
            row_insert: RowAnimation::None,
            row_delete: RowAnimation::None,
        }
    }
}

/// Configuration for a [`Reconciler`](crate::Reconciler) and its table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilerConfig {
    /// Rows from the end of a paginating section that fire `on_bottom_reached`.
    pub pagination_threshold: usize,
    /// Added to dynamic row heights only.
    pub separator_height: f64,
    /// Height of a spinner header/footer.
    pub spinner_height: f64,
    /// Removed from the container width before measuring header text.
    pub text_horizontal_margin: f64,
    pub animations: RowAnimations,
    /// `animated` flag passed to row binders during content reloads.
    pub animate_content_reloads: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            pagination_threshold: DEFAULT_PAGINATION_THRESHOLD,
            separator_height: 0.0,
            spinner_height: 50.0,
            text_horizontal_margin: 32.0,
            animations: RowAnimations::default(),
            animate_content_reloads: true,
        }
    }
}

impl ReconcilerConfig {
    #[must_use]
    pub fn with_pagination_threshold(mut self, threshold: usize) -> Self {
        self.pagination_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_separator_height(mut self, height: f64) -> Self {
        self.separator_height = height;
        self
    }

    #[must_use]
    pub fn with_spinner_height(mut self, height: f64) -> Self {
        self.spinner_height = height;
        self
    }

    #[must_use]
    pub fn with_text_horizontal_margin(mut self, margin: f64) -> Self {
        self.text_horizontal_margin = margin;
        self
    }

    #[must_use]
    pub fn with_animations(mut self, animations: RowAnimations) -> Self {
        self.animations = animations;
        self
    }

    #[must_use]
    pub fn with_animate_content_reloads(mut self, animate: bool) -> Self {
        self.animate_content_reloads = animate;
        self
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    /// Overlay values from `lookup`, keyed by environment variable name.
    ///
    /// Unset variables keep the current value; unparsable ones fail.
    pub fn overlay(mut self, lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_PAGINATION_THRESHOLD) {
            self.pagination_threshold =
                raw.trim()
                    .parse()
                    .map_err(|_| TableError::InvalidConfig {
                        var: ENV_PAGINATION_THRESHOLD,
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = lookup(ENV_SEPARATOR_HEIGHT) {
            let height = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|h| h.is_finite() && *h >= 0.0)
                .ok_or_else(|| TableError::InvalidConfig {
                    var: ENV_SEPARATOR_HEIGHT,
                    value: raw.clone(),
                })?;
            self.separator_height = height;
        }
        Ok(self)
    }
}
