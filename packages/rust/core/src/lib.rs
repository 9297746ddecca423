//! Request-level orchestration for linkpeek.
//!
//! This crate ties together input validation, page loading, and metadata
//! extraction into the end-to-end [`scrape`] workflow used by the CLI and
//! the HTTP server.

pub mod pipeline;

pub use pipeline::{parse_target, scrape};
