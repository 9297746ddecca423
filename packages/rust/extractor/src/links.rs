//! Outbound link categorization.
//!
//! Every cross-origin link lands in at most one bucket of [`RelatedLinks`];
//! the first matching rule wins.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::{Origin, Url};

use linkpeek_shared::RelatedLinks;

/// Hostname substrings that mark a social-media profile.
pub const SOCIAL_MEDIA_DOMAINS: [&str; 7] = [
    "facebook.com",
    "linkedin.com",
    "instagram.com",
    "t.me",
    "twitter.com",
    "youtube.com",
    "tiktok.com",
];

/// Anchor used as a click target rather than a destination.
const NOOP_ANCHOR: &str = "javascript:void(0);";

/// Short-link host whose targets are never kept.
const DISCARDED_HOST: &str = "youtu.be";

static IMAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif)$").expect("static regex must compile"));

/// Bucket a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    Website,
    SocialMedia,
    Email,
    PhoneNumber,
}

/// Classify one absolute link. `None` means the link is discarded.
pub fn classify(link: &str) -> Option<LinkCategory> {
    if link.is_empty() || link == NOOP_ANCHOR {
        return None;
    }
    let url = Url::parse(link).ok()?;

    match url.scheme() {
        "mailto" => return url.query().is_none().then_some(LinkCategory::Email),
        "tel" => return Some(LinkCategory::PhoneNumber),
        _ => {}
    }

    let host = url.host_str().unwrap_or_default();
    if SOCIAL_MEDIA_DOMAINS.iter().any(|domain| host.contains(domain)) {
        return Some(LinkCategory::SocialMedia);
    }

    if IMAGE_PATH.is_match(url.path()) || host.contains(DISCARDED_HOST) {
        return None;
    }

    Some(LinkCategory::Website)
}

/// Partition links into categories, collapsing duplicates.
pub fn categorize<'a>(links: impl IntoIterator<Item = &'a str>) -> RelatedLinks {
    let mut related = RelatedLinks::default();
    let mut discarded = 0usize;

    for link in links {
        let bucket = match classify(link) {
            Some(LinkCategory::Website) => &mut related.websites,
            Some(LinkCategory::SocialMedia) => &mut related.social_media,
            Some(LinkCategory::Email) => &mut related.emails,
            Some(LinkCategory::PhoneNumber) => &mut related.phone_numbers,
            None => {
                discarded += 1;
                continue;
            }
        };
        bucket.insert(link.to_string());
    }

    debug!(categorized = related.len(), discarded, "links categorized");
    related
}

/// Links whose origin differs from `document_origin`. Links that fail to
/// parse are dropped. An unparseable document origin matches nothing.
pub fn cross_origin_links<'a>(
    links: &'a [String],
    document_origin: &str,
) -> impl Iterator<Item = &'a str> + use<'a> {
    let origin: Option<Origin> = Url::parse(document_origin).ok().map(|u| u.origin());
    links.iter().filter_map(move |link| {
        let url = Url::parse(link).ok()?;
        if origin.as_ref() == Some(&url.origin()) {
            return None;
        }
        Some(link.as_str())
    })
}
