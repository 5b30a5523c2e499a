#![forbid(unsafe_code)]

//! Trailing swipe actions attached to rows.

use std::fmt;
use std::rc::Rc;

use crate::color::Rgba;

/// How a swipe action presents itself. Icons are opaque surface asset names.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPattern {
    /// Title with an optional icon above it, on a solid color.
    Text {
        title: String,
        color: Rgba,
        icon: Option<String>,
    },
    /// Icon only.
    Icon {
        icon: Option<String>,
        background: Rgba,
    },
}

/// A single swipe action. The callback receives the row's bound visual, if any.
pub struct RowAction<V> {
    pub pattern: ActionPattern,
    action: Rc<dyn Fn(Option<&V>)>,
}

impl<V> RowAction<V> {
    pub fn new(pattern: ActionPattern, action: impl Fn(Option<&V>) + 'static) -> Self {
        Self {
            pattern,
            action: Rc::new(action),
        }
    }

    /// Run the action.
    pub fn perform(&self, visual: Option<&V>) {
        (self.action)(visual);
    }
}

impl<V> Clone for RowAction<V> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            action: Rc::clone(&self.action),
        }
    }
}

impl<V> fmt::Debug for RowAction<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}
