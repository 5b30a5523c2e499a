#![forbid(unsafe_code)]

//! Sections: identified, ordered row lists with header and footer state.

use std::fmt;

use crate::header::HeaderFooter;
use crate::identity::{Identified, ItemId, SectionState};
use crate::row::Row;
use crate::visual::Visual;

/// One section of a snapshot.
pub struct Section<V> {
    id: ItemId,
    paginating: bool,
    rows: Vec<Row<V>>,
    header: HeaderFooter<V>,
    footer: HeaderFooter<V>,
}

impl<V> Section<V> {
    /// An empty, non-paginating section with zero-height margins.
    #[must_use]
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            paginating: false,
            rows: Vec::new(),
            header: HeaderFooter::default(),
            footer: HeaderFooter::default(),
        }
    }

    #[must_use]
    pub fn paginating(mut self, paginating: bool) -> Self {
        self.paginating = paginating;
        self
    }

    #[must_use]
    pub fn header(mut self, header: HeaderFooter<V>) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn footer(mut self, footer: HeaderFooter<V>) -> Self {
        self.footer = footer;
        self
    }

    /// Append one row.
    #[must_use]
    pub fn row(mut self, row: Row<V>) -> Self {
        self.rows.push(row);
        self
    }

    /// Append rows.
    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = Row<V>>) -> Self {
        self.rows.extend(rows);
        self
    }

    #[must_use]
    pub fn is_paginating(&self) -> bool {
        self.paginating
    }

    #[must_use]
    pub fn header_state(&self) -> &HeaderFooter<V> {
        &self.header
    }

    #[must_use]
    pub fn footer_state(&self) -> &HeaderFooter<V> {
        &self.footer
    }

    #[must_use]
    pub fn row_list(&self) -> &[Row<V>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row_at(&self, index: usize) -> Option<&Row<V>> {
        self.rows.get(index)
    }
}

impl<V> Identified for Section<V> {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl<V: Visual> SectionState for Section<V> {
    type Row = Row<V>;

    fn rows(&self) -> &[Row<V>] {
        &self.rows
    }

    fn same_state(&self, other: &Self) -> bool {
        self.footer == other.footer && self.header == other.header
    }
}

impl<V: Clone> Clone for Section<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            paginating: self.paginating,
            rows: self.rows.clone(),
            header: self.header.clone(),
            footer: self.footer.clone(),
        }
    }
}

impl<V> fmt::Debug for Section<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("paginating", &self.paginating)
            .field("header", &self.header)
            .field("footer", &self.footer)
            .field("rows", &self.rows)
            .finish()
    }
}
