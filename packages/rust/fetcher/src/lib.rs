//! Page loading for linkpeek.
//!
//! This crate provides:
//! - [`PageProvider`]: the capability that turns a URL into a document
//! - [`ChromePageProvider`]: renders pages in headless Chrome
//! - [`HttpPageProvider`]: fetches raw HTML over HTTP(S)
//! - [`MemoryProvider`]: serves pre-built documents, for tests and embedding
//!
//! Both network providers share the same SSRF and redirect rules.

pub mod browser;
mod guard;
pub mod http;
pub mod provider;

pub use browser::ChromePageProvider;
pub use http::HttpPageProvider;
pub use provider::{MemoryProvider, PageProvider};
