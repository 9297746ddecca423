//! Link-preview metadata extraction and outbound link categorization.
//!
//! This crate provides:
//! - [`document`]: the [`PageDocument`] query capability with an HTML-backed
//!   and an in-memory implementation
//! - [`description`], [`images`], [`icons`]: the field resolvers
//! - [`links`]: cross-origin link categorization
//! - [`extract()`]: the orchestrator producing a [`MetadataRecord`]

pub mod assembler;
pub mod description;
pub mod document;
pub mod extract;
pub mod icons;
pub mod images;
pub mod links;

pub use assembler::{ResolvedParts, assemble};
pub use document::{HtmlDocument, IconLink, ImageElement, MemoryDocument, MetaTag, PageDocument};
pub use extract::extract;
pub use images::{ImageSelection, ImageThresholds};
pub use links::{LinkCategory, categorize, classify, cross_origin_links};
pub use linkpeek_shared::{ExtractOptions, ExtractionMode, MetadataRecord, RelatedLinks};

#[cfg(test)]
mod tests {
    use super::*;
    use linkpeek_shared::LinkpeekError;
    use url::Url;

    fn load_fixture(name: &str, url: &Url) -> HtmlDocument {
        let path = format!("../../../fixtures/html/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        HtmlDocument::parse(&content, url)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    // -----------------------------------------------------------------------
    // Scenario tests (in-memory documents)
    // -----------------------------------------------------------------------

    #[test]
    fn single_hero_image_becomes_thumbnail() {
        let doc = MemoryDocument::new("https://mysite.com")
            .with_title("Hero")
            .with_image("hero.jpg", 800, 800);
        let record = extract(&doc, &url("https://mysite.com"), &ExtractOptions::default()).unwrap();
        assert_eq!(record.images, ["hero.jpg"]);
        assert_eq!(record.thumbnail.as_deref(), Some("hero.jpg"));
    }

    #[test]
    fn favicon_only_page_falls_back_to_largest_image() {
        let doc = MemoryDocument::new("https://mysite.com")
            .with_title("Tiny")
            .with_image("favicon.png", 64, 64);
        let record = extract(&doc, &url("https://mysite.com"), &ExtractOptions::default()).unwrap();
        assert_eq!(record.images, ["favicon.png"]);
        assert_eq!(record.thumbnail.as_deref(), Some("favicon.png"));
    }

    #[test]
    fn long_paragraph_used_as_description() {
        let paragraph = "p".repeat(200);
        let doc = MemoryDocument::new("https://mysite.com")
            .with_title("Article")
            .with_paragraph(format!("\n  {paragraph}  "));
        let record = extract(&doc, &url("https://mysite.com"), &ExtractOptions::default()).unwrap();
        assert_eq!(record.description, paragraph);
    }

    #[test]
    fn strict_mode_rejects_title_only_page() {
        let doc = MemoryDocument::new("https://mysite.com").with_title("Bare");
        let lenient =
            extract(&doc, &url("https://mysite.com"), &ExtractOptions::default()).unwrap();
        assert_eq!(lenient.description, "Bare");

        let strict = extract(
            &doc,
            &url("https://mysite.com"),
            &ExtractOptions::default().strict(),
        );
        assert!(matches!(
            strict,
            Err(LinkpeekError::InsufficientMetadata { ref missing })
                if missing.contains(&"images") && missing.contains(&"thumbnail")
        ));
    }

    // -----------------------------------------------------------------------
    // Fixture tests (parsed HTML)
    // -----------------------------------------------------------------------

    #[test]
    fn article_fixture_extracts_everything() {
        let page = url("https://news.example.com/2024/launch");
        let doc = load_fixture("article.html", &page);
        let record = extract(&doc, &page, &ExtractOptions::default()).unwrap();

        assert_eq!(record.full_url, "https://news.example.com");
        assert_eq!(record.title, "Launch Day | Example News");
        assert_eq!(record.description, "We shipped the thing everyone has been waiting for.");
        assert_eq!(record.keywords.as_deref(), Some("launch, product, news"));
        assert_eq!(record.og_title, "Launch Day");
        assert_eq!(record.og_site_name, "Example News");
        assert_eq!(
            record.thumbnail.as_deref(),
            Some("https://news.example.com/static/og-card.jpg")
        );
        assert_eq!(
            record.images,
            [
                "https://news.example.com/media/launch photo.jpg",
                "https://cdn.example.net/img/team.png",
                "https://news.example.com/static/og-card.jpg",
            ]
        );
        assert_eq!(
            record.icon.as_deref(),
            Some("https://news.example.com/static/favicon-32.png")
        );

        let related = &record.related_links;
        assert_eq!(
            related.websites.iter().collect::<Vec<_>>(),
            ["https://partner.example.org/launch"]
        );
        assert_eq!(
            related.social_media.iter().collect::<Vec<_>>(),
            ["https://twitter.com/examplenews", "https://www.linkedin.com/company/example"]
        );
        assert_eq!(
            related.emails.iter().collect::<Vec<_>>(),
            ["mailto:press@example.com"]
        );
        assert_eq!(
            related.phone_numbers.iter().collect::<Vec<_>>(),
            ["tel:+15550100"]
        );
    }

    #[test]
    fn sparse_fixture_uses_fallbacks() {
        let page = url("https://tiny.example.com/");
        let doc = load_fixture("sparse.html", &page);
        let record = extract(&doc, &page, &ExtractOptions::default()).unwrap();

        assert_eq!(record.title, "Tiny Shop");
        assert!(record.description.starts_with("Welcome to Tiny Shop."));
        assert!(record.description.chars().count() <= 150);
        assert_eq!(record.og_title, "Tiny Shop");
        assert_eq!(record.og_site_name, "Tiny Shop");
        assert_eq!(record.keywords, None);
        assert_eq!(
            record.icon.as_deref(),
            Some("https://tiny.example.com/brand/logo.svg")
        );
        assert_eq!(record.images, ["https://tiny.example.com/img/badge.png"]);
        assert_eq!(
            record.thumbnail.as_deref(),
            Some("https://tiny.example.com/img/badge.png")
        );
        assert_eq!(
            record.related_links.social_media.iter().collect::<Vec<_>>(),
            ["https://instagram.com/tinyshop"]
        );
        assert!(record.related_links.websites.is_empty());

        let strict = extract(&doc, &page, &ExtractOptions::default().strict());
        assert!(matches!(
            strict,
            Err(LinkpeekError::InsufficientMetadata { ref missing }) if missing == &["keywords"]
        ));
    }
}
