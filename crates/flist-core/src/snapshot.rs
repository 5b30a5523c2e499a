#![forbid(unsafe_code)]

//! Snapshots: one full, ordered sections-of-rows description of the list.

use std::fmt;

use crate::identity::{Identified, ItemId};
use crate::index::IndexPath;
use crate::row::Row;
use crate::section::Section;

/// Section identities paired with their row identities, in display order.
pub type Outline = Vec<(ItemId, Vec<ItemId>)>;

/// Ordered sections; section identities are unique within a snapshot.
pub struct Snapshot<V> {
    sections: Vec<Section<V>>,
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V> Snapshot<V> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    #[must_use]
    pub fn new(sections: Vec<Section<V>>) -> Self {
        Self { sections }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section<V>] {
        &self.sections
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section<V>> {
        self.sections.get(index)
    }

    /// Row count of a section, `None` if the section does not exist.
    #[must_use]
    pub fn row_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(Section::row_count)
    }

    #[must_use]
    pub fn row(&self, path: IndexPath) -> Option<&Row<V>> {
        self.sections.get(path.section)?.row_at(path.row)
    }

    /// Total rows across all sections.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.sections.iter().map(Section::row_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Identity outline: section ids with their row ids, in order.
    #[must_use]
    pub fn outline(&self) -> Outline {
        self.sections
            .iter()
            .map(|section| {
                (
                    section.id().clone(),
                    section.row_list().iter().map(|r| r.id().clone()).collect(),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn into_sections(self) -> Vec<Section<V>> {
        self.sections
    }
}

impl<V> From<Vec<Section<V>>> for Snapshot<V> {
    fn from(sections: Vec<Section<V>>) -> Self {
        Self::new(sections)
    }
}

impl<V> FromIterator<Section<V>> for Snapshot<V> {
    fn from_iter<I: IntoIterator<Item = Section<V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<V: Clone> Clone for Snapshot<V> {
    fn clone(&self) -> Self {
        Self {
            sections: self.sections.clone(),
        }
    }
}

impl<V> fmt::Debug for Snapshot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.sections).finish()
    }
}
