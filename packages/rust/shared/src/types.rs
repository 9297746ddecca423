//! Core domain types: the link-preview record and its categorized links.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RelatedLinks
// ---------------------------------------------------------------------------

/// Cross-origin outbound links, partitioned into disjoint categories.
///
/// Sets are ordered so that serializing the same page twice yields the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedLinks {
    /// Plain outbound web pages.
    pub websites: BTreeSet<String>,
    /// Profiles on well-known social networks.
    pub social_media: BTreeSet<String>,
    /// `mailto:` links without a query component.
    pub emails: BTreeSet<String>,
    /// `tel:` links.
    pub phone_numbers: BTreeSet<String>,
}

impl RelatedLinks {
    /// Total number of categorized links.
    pub fn len(&self) -> usize {
        self.websites.len() + self.social_media.len() + self.emails.len() + self.phone_numbers.len()
    }

    /// Whether no link was categorized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// MetadataRecord
// ---------------------------------------------------------------------------

/// Link-preview metadata for one page, built once per request.
///
/// Absent values serialize as `null`; no field is ever omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    /// Scheme + host of the requested URL (not the post-redirect URL).
    pub full_url: String,
    /// Document title, verbatim.
    pub title: String,
    /// Best textual description, falling back to the title.
    pub description: String,
    /// `keywords` meta, falling back to the `description` meta.
    pub keywords: Option<String>,
    /// `og:title`, falling back to the title.
    pub og_title: String,
    /// `og:site_name`, falling back to the title.
    pub og_site_name: String,
    /// Representative image.
    pub thumbnail: Option<String>,
    /// Logo or favicon, falling back to `og:image`.
    pub icon: Option<String>,
    /// Relevant images in document order.
    pub images: Vec<String>,
    /// Categorized outbound links.
    pub related_links: RelatedLinks,
}

impl MetadataRecord {
    /// Names of top-level fields that are null (an empty `images` list counts).
    /// `related_links` is never considered.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.keywords.is_none() {
            missing.push("keywords");
        }
        if self.thumbnail.is_none() {
            missing.push("thumbnail");
        }
        if self.icon.is_none() {
            missing.push("icon");
        }
        if self.images.is_empty() {
            missing.push("images");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MetadataRecord {
        MetadataRecord {
            full_url: "https://example.com".into(),
            title: "Example".into(),
            description: "An example page".into(),
            keywords: None,
            og_title: "Example".into(),
            og_site_name: "Example".into(),
            thumbnail: Some("https://example.com/hero.jpg".into()),
            icon: None,
            images: vec!["https://example.com/hero.jpg".into()],
            related_links: RelatedLinks::default(),
        }
    }

    #[test]
    fn record_serializes_camel_case_with_nulls() {
        let json = serde_json::to_value(sample_record()).expect("serialize");
        assert_eq!(json["fullUrl"], "https://example.com");
        assert_eq!(json["ogSiteName"], "Example");
        assert!(json["keywords"].is_null());
        assert!(json["icon"].is_null());
        assert!(json["relatedLinks"]["socialMedia"].as_array().unwrap().is_empty());
        assert!(json["relatedLinks"]["phoneNumbers"].is_array());
    }

    #[test]
    fn missing_fields_lists_nulls() {
        let mut record = sample_record();
        assert_eq!(record.missing_fields(), vec!["keywords", "icon"]);

        record.images.clear();
        record.thumbnail = None;
        record.keywords = Some("a, b".into());
        record.icon = Some("https://example.com/favicon.ico".into());
        assert_eq!(record.missing_fields(), vec!["thumbnail", "images"]);
    }

    #[test]
    fn related_links_sets_are_sorted_and_deduplicated() {
        let mut links = RelatedLinks::default();
        links.websites.insert("https://b.org/".into());
        links.websites.insert("https://a.org/".into());
        links.websites.insert("https://a.org/".into());
        assert_eq!(links.len(), 2);

        let json = serde_json::to_string(&links).expect("serialize");
        assert!(json.starts_with(r#"{"websites":["https://a.org/","https://b.org/"]"#));
    }
}
