//! Read-only query capability over a loaded page.
//!
//! Resolvers only ever see a [`PageDocument`]. [`HtmlDocument`] builds one
//! from fetched HTML; [`MemoryDocument`] is assembled by hand for tests and
//! for callers that already hold the page data.

mod html;
mod memory;

pub use html::HtmlDocument;
pub use memory::MemoryDocument;

// ---------------------------------------------------------------------------
// Element snapshots
// ---------------------------------------------------------------------------

/// A `<meta>` tag keyed by `name` and/or `property`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTag {
    /// The `name` attribute.
    pub name: Option<String>,
    /// The `property` attribute (Open Graph style).
    pub property: Option<String>,
    /// The `content` attribute.
    pub content: Option<String>,
}

/// An `<img>` element with its resolved source and natural pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    /// Absolute image URL.
    pub src: String,
    /// Natural width in pixels; 0 when unknown.
    pub natural_width: u32,
    /// Natural height in pixels; 0 when unknown.
    pub natural_height: u32,
}

impl ImageElement {
    /// Create an image snapshot.
    pub fn new(src: impl Into<String>, natural_width: u32, natural_height: u32) -> Self {
        Self {
            src: src.into(),
            natural_width,
            natural_height,
        }
    }

    /// Pixel area, or `None` when either dimension is zero.
    pub fn area(&self) -> Option<u64> {
        if self.natural_width == 0 || self.natural_height == 0 {
            return None;
        }
        Some(u64::from(self.natural_width) * u64::from(self.natural_height))
    }
}

/// A `<link rel=... href=...>` element with a resolved href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLink {
    /// Raw `rel` attribute value.
    pub rel: String,
    /// Absolute href.
    pub href: String,
}

impl IconLink {
    /// Create an icon link snapshot.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Narrow read-only view of a rendered page.
///
/// Implementations must be snapshots: repeated calls return the same data in
/// the same order.
pub trait PageDocument: Send + Sync {
    /// Document title.
    fn title(&self) -> &str;

    /// Serialized origin (`scheme://host[:port]`) of the loaded document.
    fn origin(&self) -> &str;

    /// Text content of the body.
    fn body_text(&self) -> &str;

    /// Text of every `<p>` element, in document order.
    fn paragraphs(&self) -> &[String];

    /// All `<meta>` tags, in document order.
    fn meta_tags(&self) -> &[MetaTag];

    /// All `<img>` elements with a source, in document order.
    fn images(&self) -> &[ImageElement];

    /// Absolute hrefs of all anchors, in document order.
    fn links(&self) -> &[String];

    /// All `<link>` elements carrying both `rel` and `href`, in document order.
    fn icon_links(&self) -> &[IconLink];

    /// Content of the first `meta[name=...]` with the given key.
    fn meta_by_name(&self, name: &str) -> Option<&str> {
        self.meta_tags()
            .iter()
            .find(|tag| tag.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
            .and_then(|tag| tag.content.as_deref())
    }

    /// Content of the first `meta[property=...]` with the given key.
    fn meta_by_property(&self, property: &str) -> Option<&str> {
        self.meta_tags()
            .iter()
            .find(|tag| {
                tag.property
                    .as_deref()
                    .is_some_and(|p| p.eq_ignore_ascii_case(property))
            })
            .and_then(|tag| tag.content.as_deref())
    }

    /// Meta lookup used by every resolver: `name=` first, then `property=`.
    /// Blank content counts as absent.
    fn meta(&self, key: &str) -> Option<&str> {
        non_blank(self.meta_by_name(key)).or_else(|| non_blank(self.meta_by_property(key)))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_prefers_name_over_property() {
        let doc = MemoryDocument::new("https://example.com")
            .with_meta_property("description", "from property")
            .with_meta_name("description", "from name");
        assert_eq!(doc.meta("description"), Some("from name"));
    }

    #[test]
    fn meta_falls_back_to_property_when_name_blank() {
        let doc = MemoryDocument::new("https://example.com")
            .with_meta_name("og:image", "   ")
            .with_meta_property("og:image", "https://cdn.example.com/card.png");
        assert_eq!(doc.meta("og:image"), Some("https://cdn.example.com/card.png"));
        assert_eq!(doc.meta("og:title"), None);
    }

    #[test]
    fn meta_keys_are_case_insensitive() {
        let doc = MemoryDocument::new("https://example.com").with_meta_name("Keywords", "a, b");
        assert_eq!(doc.meta("keywords"), Some("a, b"));
    }

    #[test]
    fn image_area_requires_both_dimensions() {
        assert_eq!(ImageElement::new("a.png", 10, 20).area(), Some(200));
        assert_eq!(ImageElement::new("a.png", 0, 20).area(), None);
        assert_eq!(ImageElement::new("a.png", 10, 0).area(), None);
        assert_eq!(
            ImageElement::new("a.png", u32::MAX, u32::MAX).area(),
            Some(u64::from(u32::MAX) * u64::from(u32::MAX))
        );
    }
}
