//! Merges resolver outputs and simple meta lookups into a [`MetadataRecord`].

use linkpeek_shared::{MetadataRecord, RelatedLinks};

use crate::document::PageDocument;
use crate::images::ImageSelection;

/// Everything the resolvers produced for one document.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParts {
    /// Description resolver output (possibly empty).
    pub description: String,
    /// Image selector output.
    pub images: ImageSelection,
    /// Icon/logo resolver output.
    pub icon: Option<String>,
    /// Categorized outbound links.
    pub related_links: RelatedLinks,
}

/// Build the final record, applying per-field fallbacks.
pub fn assemble(doc: &dyn PageDocument, full_url: String, parts: ResolvedParts) -> MetadataRecord {
    let title = doc.title().to_string();
    let or_title = |value: Option<&str>| value.map_or_else(|| title.clone(), str::to_string);

    let description = if parts.description.trim().is_empty() {
        title.clone()
    } else {
        parts.description
    };

    let keywords = doc
        .meta("keywords")
        .or_else(|| doc.meta("description"))
        .map(str::to_string);

    let og_title = or_title(doc.meta("og:title"));
    let og_site_name = or_title(doc.meta("og:site_name"));

    let icon = parts
        .icon
        .or_else(|| doc.meta("og:image").map(str::to_string));

    MetadataRecord {
        full_url,
        title,
        description,
        keywords,
        og_title,
        og_site_name,
        thumbnail: parts.images.best,
        icon,
        images: parts.images.relevant,
        related_links: parts.related_links,
    }
}
