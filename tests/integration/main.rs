//! Integration test suite entry point.

mod fixture;
mod matching_tests;
mod search_tests;
mod sync_tests;
