//! Utility functions and helpers.

pub mod cancel;

pub use cancel::CancelToken;
