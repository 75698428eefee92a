//! jobsearch - job search and indexing subsystem
//!
//! Keeps a full-text index of job postings in step with the relational
//! store and serves two query paths over them: filtered search against the
//! index and skill-overlap ranking against the store.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod matching;
pub mod search;
pub mod storage;
pub mod test_utils;
pub mod utils;

pub use error::{JobSearchError, Result};
