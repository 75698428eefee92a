//! Shared test utilities for jobsearch.

pub mod fixtures;
pub mod logging;

pub use fixtures::{MemoryIndex, UnitTestFixture, sample_document, seed_company, seed_job};
pub use logging::{CapturedLogs, capture_logs};
