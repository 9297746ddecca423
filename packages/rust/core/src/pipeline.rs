//! End-to-end `scrape` pipeline: URL → validate → open page → extract → record.

use std::time::Instant;

use tracing::{info, instrument, warn};
use url::Url;

use linkpeek_extractor::{PageDocument, extract};
use linkpeek_fetcher::PageProvider;
use linkpeek_shared::{ExtractOptions, LinkpeekError, MetadataRecord, Result};

/// Message returned when no URL was supplied.
const MISSING_URL: &str = "URL parameter is required";

/// Validate raw user input into an absolute URL.
///
/// Blank or absent input is [`LinkpeekError::MissingInput`]; anything that
/// does not parse as an absolute URL is [`LinkpeekError::InvalidUrl`].
pub fn parse_target(raw: Option<&str>) -> Result<Url> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(LinkpeekError::missing_input(MISSING_URL));
    }

    Url::parse(raw).map_err(|e| LinkpeekError::invalid_url(raw, e.to_string()))
}

/// Run the full scrape pipeline for one URL.
///
/// 1. Validate the input URL
/// 2. Open the page through `provider`
/// 3. Extract the metadata record on the blocking pool
///
/// The page is dropped before returning, whichever way the pipeline ends. A
/// panic inside extraction surfaces as [`LinkpeekError::Extraction`].
#[instrument(skip_all, fields(provider = provider.name(), mode = %options.mode))]
pub async fn scrape<P: PageProvider>(
    provider: &P,
    url: Option<&str>,
    options: &ExtractOptions,
) -> Result<MetadataRecord> {
    let start = Instant::now();
    let target = parse_target(url)?;

    info!(url = %target, "starting scrape");

    let doc = provider.open(&target).await.inspect_err(|e| {
        warn!(url = %target, error = %e, "page failed to load");
    })?;

    let result = run_extraction(doc, &target, *options).await;

    let elapsed = start.elapsed();
    match &result {
        Ok(record) => info!(
            url = %target,
            images = record.images.len(),
            related_links = record.related_links.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "scrape complete"
        ),
        Err(e) => warn!(
            url = %target,
            error = %e,
            elapsed_ms = elapsed.as_millis() as u64,
            "scrape rejected"
        ),
    }

    result
}

/// Run the CPU-bound extractor off the async workers; consumes the page.
async fn run_extraction<D>(doc: D, target: &Url, options: ExtractOptions) -> Result<MetadataRecord>
where
    D: PageDocument + 'static,
{
    let requested = target.clone();
    tokio::task::spawn_blocking(move || extract(&doc, &requested, &options))
        .await
        .map_err(|e| LinkpeekError::Extraction(format!("{target}: extraction aborted: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpeek_extractor::{IconLink, ImageElement, MemoryDocument, MetaTag};
    use linkpeek_fetcher::MemoryProvider;

    /// A page whose title lookup blows up mid-extraction.
    struct BrokenDocument;

    impl PageDocument for BrokenDocument {
        fn title(&self) -> &str {
            panic!("title unavailable")
        }
        fn origin(&self) -> &str {
            "https://broken.example.com"
        }
        fn body_text(&self) -> &str {
            ""
        }
        fn paragraphs(&self) -> &[String] {
            &[]
        }
        fn meta_tags(&self) -> &[MetaTag] {
            &[]
        }
        fn images(&self) -> &[ImageElement] {
            &[]
        }
        fn links(&self) -> &[String] {
            &[]
        }
        fn icon_links(&self) -> &[IconLink] {
            &[]
        }
    }

    struct BrokenProvider;

    impl PageProvider for BrokenProvider {
        type Document = BrokenDocument;

        async fn open(&self, _url: &Url) -> Result<BrokenDocument> {
            Ok(BrokenDocument)
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with_page(
                "https://mysite.com/",
                MemoryDocument::new("https://mysite.com")
                    .with_title("My Site")
                    .with_meta_name("description", "All about my site")
                    .with_meta_name("keywords", "mine")
                    .with_image("https://mysite.com/hero.jpg", 800, 800)
                    .with_icon_link("icon", "https://mysite.com/favicon.ico")
                    .with_link("https://twitter.com/mysite"),
            )
            .with_page(
                "https://bare.example.com/",
                MemoryDocument::new("https://bare.example.com").with_title("Bare"),
            )
    }

    #[test]
    fn parse_target_rejects_missing_and_blank_input() {
        for input in [None, Some(""), Some("   ")] {
            let err = parse_target(input).unwrap_err();
            assert!(matches!(err, LinkpeekError::MissingInput { .. }));
            assert_eq!(err.to_string(), "URL parameter is required");
        }
    }

    #[test]
    fn parse_target_rejects_relative_urls() {
        let err = parse_target(Some("not a url")).unwrap_err();
        assert!(matches!(err, LinkpeekError::InvalidUrl { .. }));
    }

    #[test]
    fn parse_target_trims_whitespace() {
        let url = parse_target(Some("  https://mysite.com/page \n")).unwrap();
        assert_eq!(url.as_str(), "https://mysite.com/page");
    }

    #[tokio::test]
    async fn scrape_returns_record() {
        let record = scrape(
            &provider(),
            Some("https://mysite.com"),
            &ExtractOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(record.full_url, "https://mysite.com");
        assert_eq!(record.title, "My Site");
        assert_eq!(record.description, "All about my site");
        assert_eq!(record.thumbnail.as_deref(), Some("https://mysite.com/hero.jpg"));
        assert!(record.related_links.social_media.contains("https://twitter.com/mysite"));
    }

    #[tokio::test]
    async fn scrape_without_url_fails_before_loading() {
        let err = scrape(&provider(), None, &ExtractOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn scrape_surfaces_navigation_failures() {
        let err = scrape(
            &provider(),
            Some("https://unknown.example.com/"),
            &ExtractOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LinkpeekError::Navigation(_)));
    }

    #[tokio::test]
    async fn strict_scrape_rejects_bare_page() {
        let url = Some("https://bare.example.com/");

        let lenient = scrape(&provider(), url, &ExtractOptions::default()).await;
        assert!(lenient.is_ok());

        let strict = scrape(&provider(), url, &ExtractOptions::default().strict()).await;
        assert!(matches!(
            strict,
            Err(LinkpeekError::InsufficientMetadata { .. })
        ));
    }

    #[tokio::test]
    async fn extractor_panic_becomes_extraction_error() {
        let err = scrape(
            &BrokenProvider,
            Some("https://broken.example.com/"),
            &ExtractOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LinkpeekError::Extraction(ref msg) if msg.contains("broken.example.com")));
        assert!(!err.is_input_error());
    }
}
