mod column;
pub mod date;
mod enums;
mod export;
mod field;
mod filter;
mod page;
mod stats;
mod tag;

use thiserror::Error;

#[rustfmt::skip]
pub use {
    column::Column,
    enums::{AreaCode, JobStatus, WorkOrderStatus},
    export::{DateRangeShortcut, ExportFormat},
    field::{FieldErrors, WorkOrderField},
    filter::{FilterField, ListFilter, SortField, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT},
    page::{Pagination, WorkOrderPage},
    stats::{BulkUpdateResult, WorkOrderStats},
    tag::{CacheKey, CacheTag},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value:?}.")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercase with separators removed, used for lenient enum parsing.
pub fn loose_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
