//! Error types for jobsearch

use thiserror::Error;

/// Errors surfaced by the indexing, search and matching paths.
#[derive(Error, Debug)]
pub enum JobSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Search index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Caller supplied parameters that were rejected before any I/O.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Job not found: {0}")]
    JobNotFound(i64),

    #[error("Job {job_id} references missing company {company_id}")]
    MissingCompany { job_id: i64, company_id: i64 },

    /// The indexing session could not be opened; nothing in the run was attempted.
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl JobSearchError {
    /// Whether retrying the same call later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Database(_) | Self::Index(_) | Self::IndexUnavailable(_)
        )
    }

    /// Whether the error is the caller's fault rather than a storage fault.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// Stable machine-readable code used by robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Database(_) => "database",
            Self::Index(_) => "index",
            Self::Serialization(_) => "serialization",
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::InvalidQuery(_) => "invalid_query",
            Self::JobNotFound(_) => "not_found",
            Self::MissingCompany { .. } => "missing_company",
            Self::IndexUnavailable(_) => "index_unavailable",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<serde_json::Error> for JobSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JobSearchError>;
