//! Core query types shared by the search and matching paths

pub mod pagination;

pub use pagination::Pagination;
