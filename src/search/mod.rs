//! Search index for jobs
//!
//! Projection of relational rows into documents, bulk indexing into the
//! tantivy index and filtered queries over it.

pub mod bulk;
pub mod client;
pub mod document;
pub mod filters;
pub mod sync;
pub mod tantivy_index;

pub use bulk::{BulkConfig, BulkIndexer, BulkStats, ItemFailure};
pub use client::{IndexClient, IndexSession, ItemError};
pub use document::{JobDocument, build_document};
pub use filters::{FilteredSearch, SearchCriteria, SearchResult};
pub use sync::{IndexSynchronizer, SkippedJob, SyncReport};
pub use tantivy_index::JobIndex;
