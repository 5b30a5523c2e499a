#![forbid(unsafe_code)]

//! Identity & change model.
//!
//! Reconciliation never compares items structurally. Two predicates drive
//! every decision:
//!
//! - [`same_identity`]: the two values describe "the same logical thing".
//! - [`content_changed`]: the same logical thing now renders differently.
//!
//! # Invariants
//!
//! 1. Identities are unique within one ordered collection (a section list or
//!    one section's row list). Duplicates are tolerated, never rejected; the
//!    reconcilers resolve them with a first-match policy.
//! 2. An absent content version never signals a change. Only two present,
//!    unequal versions do.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable opaque key identifying one logical item across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Arc<str>);

impl ItemId {
    /// Create an identity from any string-like value.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// Opaque content marker, typically a hash of whatever the row renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentVersion(Arc<str>);

impl ContentVersion {
    #[must_use]
    pub fn new(version: impl AsRef<str>) -> Self {
        Self(Arc::from(version.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentVersion {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

/// Anything the reconcilers can match by identity.
pub trait Identified {
    /// Identity key, unique within the containing collection.
    fn id(&self) -> &ItemId;

    /// Content version; `None` means "never reload on content grounds".
    fn content_version(&self) -> Option<&ContentVersion> {
        None
    }
}

/// A section as seen by the section reconciler: an identified, ordered row
/// list plus header/footer state.
pub trait SectionState: Identified {
    type Row: Identified;

    /// Rows in display order.
    fn rows(&self) -> &[Self::Row];

    /// Whether header and footer render identically to `other`'s.
    ///
    /// A `false` result marks the section for a structural reload.
    fn same_state(&self, other: &Self) -> bool;
}

/// Identity equality.
#[inline]
#[must_use]
pub fn same_identity<A, B>(a: &A, b: &B) -> bool
where
    A: Identified + ?Sized,
    B: Identified + ?Sized,
{
    a.id() == b.id()
}

/// True iff both sides carry a content version and the versions differ.
#[inline]
#[must_use]
pub fn content_changed<A, B>(a: &A, b: &B) -> bool
where
    A: Identified + ?Sized,
    B: Identified + ?Sized,
{
    match (a.content_version(), b.content_version()) {
        (Some(old), Some(new)) => old != new,
        _ => false,
    }
}
