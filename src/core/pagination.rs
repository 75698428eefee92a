//! Validated limit/offset pagination shared by the query paths.

use serde::{Deserialize, Serialize};

use crate::error::{JobSearchError, Result};

/// A page window that has already passed validation.
///
/// Constructed only through [`Pagination::new`], so storage layers never see
/// a negative or oversized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    limit: usize,
    offset: usize,
}

impl Pagination {
    /// Validate a raw `(limit, offset)` pair against `max_page_size`.
    pub fn new(limit: i64, offset: i64, max_page_size: usize) -> Result<Self> {
        if limit < 0 {
            return Err(JobSearchError::InvalidQuery(format!(
                "limit must not be negative (got {limit})"
            )));
        }
        if offset < 0 {
            return Err(JobSearchError::InvalidQuery(format!(
                "offset must not be negative (got {offset})"
            )));
        }
        let limit = usize::try_from(limit)
            .map_err(|_| JobSearchError::InvalidQuery(format!("limit {limit} out of range")))?;
        let offset = usize::try_from(offset)
            .map_err(|_| JobSearchError::InvalidQuery(format!("offset {offset} out of range")))?;
        if limit > max_page_size {
            return Err(JobSearchError::InvalidQuery(format!(
                "limit {limit} exceeds maximum page size {max_page_size}"
            )));
        }
        Ok(Self { limit, offset })
    }

    /// First window of `limit` items, for internal page iteration.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The window following this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// Apply the window to an already ordered list.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }

    /// SQL `LIMIT ? OFFSET ?` parameters.
    #[must_use]
    pub fn sql_params(&self) -> (i64, i64) {
        (
            i64::try_from(self.limit).unwrap_or(i64::MAX),
            i64::try_from(self.offset).unwrap_or(i64::MAX),
        )
    }
}
