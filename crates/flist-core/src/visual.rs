#![forbid(unsafe_code)]

//! The visual-object contract.
//!
//! Visuals are owned by the rendering surface. The core only ever sees
//! cheap handles to them (`Clone`), compares them by identity, and pokes a
//! handful of surface-agnostic properties during binding. Everything a row
//! wants to draw goes through the row's own bind closure.

use std::fmt;
use std::sync::Arc;

use crate::color::Rgba;

/// A handle to a surface-owned visual object (cell, header, or footer).
pub trait Visual: Clone {
    /// Identity comparison: both handles refer to the same visual object.
    fn same_visual(&self, other: &Self) -> bool;

    /// Apply a row's separator inset on bind.
    fn set_separator_inset(&self, _inset: Insets) {}

    /// Paint a flat background (empty rows, colored margins).
    fn set_background(&self, _color: Rgba) {}

    /// Bind a text header/footer label.
    fn bind_label(&self, _text: &str, _top_margin: f64) {}

    /// Start the activity indicator of a spinner header/footer.
    fn start_activity(&self) {}
}

/// Key under which the surface keeps reusable visuals of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReuseKey(Arc<str>);

impl ReuseKey {
    /// Spacer rows created by [`Row::empty`](crate::row::Row::empty).
    pub const EMPTY: &'static str = "empty";
    /// Text headers and footers.
    pub const LABEL: &'static str = "section.label";
    /// Colored-margin headers and footers.
    pub const COLOR: &'static str = "section.color";
    /// Loading-spinner headers and footers.
    pub const SPINNER: &'static str = "section.spinner";

    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReuseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReuseKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ReuseKey {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// Edge insets in surface points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Inset that pushes a separator fully off-screen.
    pub const HIDDEN_SEPARATOR: Self = Self::new(0.0, 10_000.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}
