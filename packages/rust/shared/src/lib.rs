//! Shared types, error model, and configuration for linkpeek.
//!
//! This crate is the foundation depended on by all other linkpeek crates.
//! It provides:
//! - [`LinkpeekError`]: the unified error type
//! - Domain types ([`MetadataRecord`], [`RelatedLinks`])
//! - Configuration ([`AppConfig`], [`ExtractOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractOptions, ExtractionConfig, ExtractionMode, FetchBackend, FetchConfig,
    ServerConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{LinkpeekError, Result};
pub use types::{MetadataRecord, RelatedLinks};
