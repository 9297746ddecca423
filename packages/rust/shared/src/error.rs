//! Error types for linkpeek.
//!
//! Library crates use [`LinkpeekError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics, and the HTTP
//! server maps each kind to a response status.

use std::path::PathBuf;

/// Top-level error type for all linkpeek operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkpeekError {
    /// The target URL was not supplied.
    #[error("{message}")]
    MissingInput { message: String },

    /// The target URL was supplied but could not be parsed.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The page could not be loaded (DNS, TLS, timeout, HTTP error status).
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Extraction finished but the record is too sparse to be useful.
    #[error("insufficient metadata: missing {}", .missing.join(", "))]
    InsufficientMetadata { missing: Vec<&'static str> },

    /// Any other fault while querying the loaded document.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Failure constructing the HTTP client or binding the server.
    #[error("network error: {0}")]
    Network(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LinkpeekError>;

impl LinkpeekError {
    /// Create a missing-input error from any displayable message.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput {
            message: msg.into(),
        }
    }

    /// Create an invalid-URL error for the given raw input.
    pub fn invalid_url(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller supplied bad input (as opposed to a server-side fault).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::InvalidUrl { .. })
    }
}
