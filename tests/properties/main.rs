//! Property test suite entry point.

mod matching_properties;
mod paging_properties;
mod projection_properties;
