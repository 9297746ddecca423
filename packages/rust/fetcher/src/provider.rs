//! Page-provider capability and an in-memory implementation.

use std::collections::HashMap;
use std::future::Future;

use url::Url;

use linkpeek_extractor::{MemoryDocument, PageDocument};
use linkpeek_shared::{LinkpeekError, Result};

/// Loads a URL into a [`PageDocument`].
///
/// Implementations own navigation concerns (timeouts, redirects, transport
/// errors) and report any failure as [`LinkpeekError::Navigation`].
pub trait PageProvider: Send + Sync {
    /// Document type handed to the extractor.
    type Document: PageDocument + 'static;

    /// Load `url` and return a ready document.
    fn open(&self, url: &Url) -> impl Future<Output = Result<Self::Document>> + Send;

    /// Human-readable provider name for tracing.
    fn name(&self) -> &str;
}

/// Serves pre-built documents keyed by URL. Unknown URLs fail navigation.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    pages: HashMap<String, MemoryDocument>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `doc` as the page served for `url`.
    pub fn with_page(mut self, url: &str, doc: MemoryDocument) -> Self {
        let key = Url::parse(url).map_or_else(|_| url.to_string(), String::from);
        self.pages.insert(key, doc);
        self
    }
}

impl PageProvider for MemoryProvider {
    type Document = MemoryDocument;

    async fn open(&self, url: &Url) -> Result<MemoryDocument> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| LinkpeekError::Navigation(format!("{url}: no such page")))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
