#![forbid(unsafe_code)]

//! Section header/footer descriptors.
//!
//! A closed set of states. Equality is the "same state" predicate the
//! section reconciler uses to decide whether a surviving section needs a
//! structural reload:
//!
//! | State           | Equal when                          |
//! |-----------------|-------------------------------------|
//! | `Margin`        | heights match                       |
//! | `ColoredMargin` | heights and colors match            |
//! | `Custom`        | content versions match (binder ignored) |
//! | `Fixed`         | the same visual object              |
//! | `Text`          | text and both margins match         |
//! | `Spinner`       | always                              |
//!
//! Different variants are never equal.

use std::fmt;
use std::rc::Rc;

use crate::color::Rgba;
use crate::identity::ContentVersion;
use crate::measure::TextMeasure;
use crate::row::HeightFn;
use crate::visual::{ReuseKey, Visual};

/// Metrics needed to resolve header/footer heights.
#[derive(Clone, Copy)]
pub struct HeaderMetrics<'a> {
    pub measure: &'a dyn TextMeasure,
    pub spinner_height: f64,
    /// Horizontal content margin removed from the container width before
    /// measuring text.
    pub text_horizontal_margin: f64,
}

/// A custom header/footer whose content is tracked by version.
pub struct CustomHeader<V> {
    pub content_version: ContentVersion,
    pub reuse_key: ReuseKey,
    pub binder: Option<Rc<dyn Fn(&V)>>,
    pub dynamic_height: HeightFn,
}

impl<V> Clone for CustomHeader<V> {
    fn clone(&self) -> Self {
        Self {
            content_version: self.content_version.clone(),
            reuse_key: self.reuse_key.clone(),
            binder: self.binder.clone(),
            dynamic_height: Rc::clone(&self.dynamic_height),
        }
    }
}

/// Header or footer descriptor of a section.
pub enum HeaderFooter<V> {
    Margin {
        height: f64,
    },
    ColoredMargin {
        height: f64,
        color: Option<Rgba>,
    },
    Custom(CustomHeader<V>),
    Fixed {
        visual: V,
        height: f64,
    },
    Text {
        text: String,
        top_margin: f64,
        bottom_margin: f64,
    },
    Spinner,
}

impl<V> Default for HeaderFooter<V> {
    fn default() -> Self {
        Self::Margin { height: 0.0 }
    }
}

impl<V> HeaderFooter<V> {
    #[must_use]
    pub const fn margin(height: f64) -> Self {
        Self::Margin { height }
    }

    #[must_use]
    pub const fn colored_margin(height: f64, color: Option<Rgba>) -> Self {
        Self::ColoredMargin { height, color }
    }

    #[must_use]
    pub fn text(text: impl Into<String>, top_margin: f64, bottom_margin: f64) -> Self {
        Self::Text {
            text: text.into(),
            top_margin,
            bottom_margin,
        }
    }

    #[must_use]
    pub fn custom(
        content_version: impl Into<ContentVersion>,
        reuse_key: impl Into<ReuseKey>,
        dynamic_height: impl Fn(f64) -> f64 + 'static,
    ) -> Self {
        Self::Custom(CustomHeader {
            content_version: content_version.into(),
            reuse_key: reuse_key.into(),
            binder: None,
            dynamic_height: Rc::new(dynamic_height),
        })
    }

    /// Attach a binder to a custom header. No effect on other states.
    #[must_use]
    pub fn with_binder(mut self, binder: impl Fn(&V) + 'static) -> Self {
        if let Self::Custom(custom) = &mut self {
            custom.binder = Some(Rc::new(binder));
        }
        self
    }

    #[must_use]
    pub const fn fixed(visual: V, height: f64) -> Self {
        Self::Fixed { visual, height }
    }

    /// Height for a container of the given width.
    #[must_use]
    pub fn height(&self, container_width: f64, metrics: &HeaderMetrics<'_>) -> f64 {
        match self {
            Self::Margin { height } | Self::ColoredMargin { height, .. } => *height,
            Self::Custom(custom) => (custom.dynamic_height)(container_width),
            Self::Fixed { height, .. } => *height,
            Self::Text {
                text,
                top_margin,
                bottom_margin,
            } => {
                let width = (container_width - metrics.text_horizontal_margin).max(0.0);
                (metrics.measure.text_height(text, width) + top_margin + bottom_margin).ceil()
            }
            Self::Spinner => metrics.spinner_height,
        }
    }

    /// Reuse key the surface must resolve for this state, if any.
    #[must_use]
    pub fn reuse_key(&self) -> Option<ReuseKey> {
        match self {
            Self::Margin { .. } | Self::Fixed { .. } => None,
            Self::ColoredMargin { .. } => Some(ReuseKey::new(ReuseKey::COLOR)),
            Self::Custom(custom) => Some(custom.reuse_key.clone()),
            Self::Text { .. } => Some(ReuseKey::new(ReuseKey::LABEL)),
            Self::Spinner => Some(ReuseKey::new(ReuseKey::SPINNER)),
        }
    }
}

impl<V: Visual> HeaderFooter<V> {
    /// Configure a dequeued visual for this state.
    pub fn bind_visual(&self, visual: &V) {
        match self {
            Self::Custom(custom) => {
                if let Some(binder) = &custom.binder {
                    binder(visual);
                }
            }
            Self::Text {
                text, top_margin, ..
            } => visual.bind_label(text, *top_margin),
            Self::Spinner => visual.start_activity(),
            Self::ColoredMargin {
                color: Some(color), ..
            } => visual.set_background(*color),
            Self::ColoredMargin { color: None, .. } | Self::Margin { .. } | Self::Fixed { .. } => {}
        }
    }
}

impl<V: Visual> PartialEq for HeaderFooter<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Margin { height: a }, Self::Margin { height: b }) => a == b,
            (
                Self::ColoredMargin {
                    height: ha,
                    color: ca,
                },
                Self::ColoredMargin {
                    height: hb,
                    color: cb,
                },
            ) => ha == hb && ca == cb,
            (Self::Custom(a), Self::Custom(b)) => a.content_version == b.content_version,
            (Self::Fixed { visual: a, .. }, Self::Fixed { visual: b, .. }) => a.same_visual(b),
            (
                Self::Text {
                    text: ta,
                    top_margin: topa,
                    bottom_margin: bota,
                },
                Self::Text {
                    text: tb,
                    top_margin: topb,
                    bottom_margin: botb,
                },
            ) => ta == tb && topa == topb && bota == botb,
            (Self::Spinner, Self::Spinner) => true,
            _ => false,
        }
    }
}

impl<V: Clone> Clone for HeaderFooter<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Margin { height } => Self::Margin { height: *height },
            Self::ColoredMargin { height, color } => Self::ColoredMargin {
                height: *height,
                color: *color,
            },
            Self::Custom(custom) => Self::Custom(custom.clone()),
            Self::Fixed { visual, height } => Self::Fixed {
                visual: visual.clone(),
                height: *height,
            },
            Self::Text {
                text,
                top_margin,
                bottom_margin,
            } => Self::Text {
                text: text.clone(),
                top_margin: *top_margin,
                bottom_margin: *bottom_margin,
            },
            Self::Spinner => Self::Spinner,
        }
    }
}

impl<V> fmt::Debug for HeaderFooter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Margin { height } => f.debug_struct("Margin").field("height", height).finish(),
            Self::ColoredMargin { height, color } => f
                .debug_struct("ColoredMargin")
                .field("height", height)
                .field("color", color)
                .finish(),
            Self::Custom(custom) => f
                .debug_struct("Custom")
                .field("content_version", &custom.content_version)
                .field("reuse_key", &custom.reuse_key)
                .finish_non_exhaustive(),
            Self::Fixed { height, .. } => f
                .debug_struct("Fixed")
                .field("height", height)
                .finish_non_exhaustive(),
            Self::Text {
                text,
                top_margin,
                bottom_margin,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("top_margin", top_margin)
                .field("bottom_margin", bottom_margin)
                .finish(),
            Self::Spinner => f.write_str("Spinner"),
        }
    }
}
