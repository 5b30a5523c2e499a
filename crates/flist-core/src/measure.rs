#![forbid(unsafe_code)]

//! Text measurement collaborator.
//!
//! Text headers and footers size themselves from the rendered height of
//! their label. Real surfaces plug in their platform text engine; surfaces
//! that draw on a character grid can use [`MonospaceMeasure`].

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Measures wrapped text height for a given width.
pub trait TextMeasure {
    /// Height of `text` laid out in a box `width` points wide.
    fn text_height(&self, text: &str, width: f64) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, f64) -> f64,
{
    fn text_height(&self, text: &str, width: f64) -> f64 {
        self(text, width)
    }
}

/// Fixed-pitch measurement: every display column is `cell_width` wide and
/// every wrapped line is `line_height` tall.
///
/// Wrapping is per grapheme cluster; a cluster wider than the box still
/// occupies a line of its own. Empty text measures zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub cell_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(8.0, 16.0)
    }
}

impl MonospaceMeasure {
    #[must_use]
    pub const fn new(cell_width: f64, line_height: f64) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }

    /// Number of wrapped lines `text` needs at `columns` columns.
    #[must_use]
    pub fn line_count(text: &str, columns: usize) -> usize {
        if text.is_empty() {
            return 0;
        }
        let columns = columns.max(1);
        text.split('\n')
            .map(|paragraph| {
                let mut lines = 1usize;
                let mut used = 0usize;
                for grapheme in paragraph.graphemes(true) {
                    let w = UnicodeWidthStr::width(grapheme);
                    if used > 0 && used + w > columns {
                        lines += 1;
                        used = 0;
                    }
                    used += w;
                }
                lines
            })
            .sum()
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_height(&self, text: &str, width: f64) -> f64 {
        let columns = if self.cell_width > 0.0 {
            (width / self.cell_width).floor() as usize
        } else {
            usize::MAX
        };
        Self::line_count(text, columns) as f64 * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_height() {
        assert_eq!(MonospaceMeasure::default().text_height("", 100.0), 0.0);
    }

    #[test]
    fn wraps_at_column_limit() {
        assert_eq!(MonospaceMeasure::line_count("abcd", 4), 1);
        assert_eq!(MonospaceMeasure::line_count("abcde", 4), 2);
        assert_eq!(MonospaceMeasure::line_count("ab\ncd", 10), 2);
        assert_eq!(MonospaceMeasure::line_count("abc", 0), 3);
    }

    #[test]
    fn wide_graphemes_take_two_columns() {
        // Each CJK ideograph is two columns wide.
        assert_eq!(MonospaceMeasure::line_count("日本語", 4), 2);
        assert_eq!(MonospaceMeasure::line_count("日本語", 6), 1);
    }

    #[test]
    fn closures_are_measures() {
        let fixed = |_: &str, _: f64| 21.0;
        assert_eq!(fixed.text_height("anything", 10.0), 21.0);
    }
}
