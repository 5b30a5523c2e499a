#![forbid(unsafe_code)]

//! Index types shared by the reconcilers and the rendering surface.
//!
//! Two index spaces exist during every transaction: the *old* space
//! (positions in the retained snapshot) and the *new* space (positions in
//! the incoming snapshot). Neither type here records which space it lives
//! in; the field it is stored in does.

use std::fmt;

/// A row position: section index plus row index within that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    #[inline]
    #[must_use]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// Sorted, duplicate-free set of indices.
///
/// Section edits are sets: inserting the same index twice is a no-op and
/// iteration is always ascending, which is what surfaces expect when they
/// apply a batch of section inserts or deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IndexSet {
    values: Vec<usize>,
}

impl IndexSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Insert an index. Returns `false` if it was already present.
    pub fn insert(&mut self, value: usize) -> bool {
        match self.values.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.values.insert(pos, value);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, value: usize) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.values.iter().copied()
    }

    /// Sorted slice view.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.values
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut values: Vec<usize> = iter.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }
}

impl Extend<usize> for IndexSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter().copied()
    }
}
