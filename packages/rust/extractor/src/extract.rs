//! Extraction orchestrator: runs every resolver over one document.

use tracing::{debug, instrument};
use url::Url;

use linkpeek_shared::{ExtractOptions, ExtractionMode, LinkpeekError, MetadataRecord, Result};

use crate::assembler::{self, ResolvedParts};
use crate::document::PageDocument;
use crate::images::{self, ImageThresholds};
use crate::{description, icons, links};

/// Extract a [`MetadataRecord`] from `doc`.
///
/// `requested_url` is the URL the caller asked for; its origin becomes
/// `fullUrl` even if the page was served after redirects. In
/// [`ExtractionMode::Strict`] a record with any null field is rejected with
/// [`LinkpeekError::InsufficientMetadata`].
#[instrument(skip_all, fields(url = %requested_url, mode = %options.mode))]
pub fn extract(
    doc: &dyn PageDocument,
    requested_url: &Url,
    options: &ExtractOptions,
) -> Result<MetadataRecord> {
    let og_image = doc.meta("og:image");

    let parts = ResolvedParts {
        description: description::resolve(doc),
        images: images::select(doc.images(), og_image, ImageThresholds::from(options)),
        icon: icons::resolve(doc),
        related_links: links::categorize(links::cross_origin_links(doc.links(), doc.origin())),
    };

    let full_url = requested_url.origin().ascii_serialization();
    let record = assembler::assemble(doc, full_url, parts);

    let missing = record.missing_fields();
    debug!(
        images = record.images.len(),
        related_links = record.related_links.len(),
        ?missing,
        "record assembled"
    );

    if options.mode == ExtractionMode::Strict && !missing.is_empty() {
        return Err(LinkpeekError::InsufficientMetadata { missing });
    }

    Ok(record)
}
