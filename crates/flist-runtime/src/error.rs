#![forbid(unsafe_code)]

use flist_core::{IndexPath, ReuseKey};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TableError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("index path [{section}, {row}] out of range")]
    IndexOutOfRange { section: usize, row: usize },

    #[error("section {section} out of range")]
    SectionOutOfRange { section: usize },

    #[error("no visual registered for reuse key {reuse_key}")]
    MissingProvider { reuse_key: ReuseKey },

    #[error("data source is not set or was dropped")]
    NoDataSource,

    #[error("invalid value {value:?} for {var}")]
    InvalidConfig { var: &'static str, value: String },
}

impl TableError {
    #[must_use]
    pub fn out_of_range(path: IndexPath) -> Self {
        Self::IndexOutOfRange {
            section: path.section,
            row: path.row,
        }
    }

    #[must_use]
    pub fn missing_provider(reuse_key: &ReuseKey) -> Self {
        Self::MissingProvider {
            reuse_key: reuse_key.clone(),
        }
    }
}
