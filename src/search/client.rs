//! Search index client abstraction
//!
//! The sync pipeline and the filtered search only talk to the index through
//! these traits. Errors are split in two: opening a session can fail for the
//! whole run ([`JobSearchError::IndexUnavailable`]), while a single upsert
//! fails with an [`ItemError`] that is recorded and does not stop the batch.
//!
//! [`JobSearchError::IndexUnavailable`]: crate::error::JobSearchError::IndexUnavailable

use thiserror::Error;

use crate::core::Pagination;
use crate::error::Result;
use crate::search::document::JobDocument;
use crate::search::filters::{SearchCriteria, SearchResult};

/// Failure of one document inside an otherwise healthy session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ItemError {
    pub message: String,
}

impl ItemError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A shared, thread-safe handle to the search index.
pub trait IndexClient: Send + Sync {
    /// Open a write session. Failure here is session-level.
    fn open_session(&self) -> Result<Box<dyn IndexSession>>;

    /// Stored document for a job id, if indexed.
    fn get(&self, job_id: i64) -> Result<Option<JobDocument>>;

    /// Remove the document for a job id. Returns whether one existed.
    fn delete(&self, job_id: i64) -> Result<bool>;

    /// Scored hits for `criteria`, best first, windowed by `page`.
    fn search(&self, criteria: &SearchCriteria, page: Pagination) -> Result<Vec<SearchResult>>;

    /// Number of indexed documents.
    fn count(&self) -> Result<u64>;
}

/// Write session shared by the bulk workers.
pub trait IndexSession: Send + Sync {
    /// Insert or fully replace the document keyed by `doc.id`.
    fn upsert(&self, doc: &JobDocument) -> std::result::Result<(), ItemError>;

    /// Make every acknowledged upsert visible to readers.
    fn commit(&self) -> Result<()>;
}
