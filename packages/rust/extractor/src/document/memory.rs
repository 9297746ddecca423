//! In-memory [`PageDocument`] assembled field by field.

use super::{IconLink, ImageElement, MetaTag, PageDocument};

/// A hand-built page snapshot.
///
/// ```
/// use linkpeek_extractor::{MemoryDocument, PageDocument};
///
/// let doc = MemoryDocument::new("https://mysite.com")
///     .with_title("My Site")
///     .with_meta_property("og:image", "https://mysite.com/card.png")
///     .with_image("https://mysite.com/hero.jpg", 800, 800);
/// assert_eq!(doc.meta("og:image"), Some("https://mysite.com/card.png"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    origin: String,
    title: String,
    body_text: String,
    paragraphs: Vec<String>,
    meta_tags: Vec<MetaTag>,
    images: Vec<ImageElement>,
    links: Vec<String>,
    icon_links: Vec<IconLink>,
}

impl MemoryDocument {
    /// Start an empty document served from `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = text.into();
        self
    }

    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    pub fn with_meta_name(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta_tags.push(MetaTag {
            name: Some(name.into()),
            property: None,
            content: Some(content.into()),
        });
        self
    }

    pub fn with_meta_property(
        mut self,
        property: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.meta_tags.push(MetaTag {
            name: None,
            property: Some(property.into()),
            content: Some(content.into()),
        });
        self
    }

    /// Push a tag exactly as found on the page (either key may be missing).
    pub fn with_meta_tag(mut self, tag: MetaTag) -> Self {
        self.meta_tags.push(tag);
        self
    }

    pub fn with_image(mut self, src: impl Into<String>, width: u32, height: u32) -> Self {
        self.images.push(ImageElement::new(src, width, height));
        self
    }

    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.links.push(href.into());
        self
    }

    pub fn with_icon_link(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.icon_links.push(IconLink::new(rel, href));
        self
    }
}

impl PageDocument for MemoryDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn body_text(&self) -> &str {
        &self.body_text
    }

    fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    fn images(&self) -> &[ImageElement] {
        &self.images
    }

    fn links(&self) -> &[String] {
        &self.links
    }

    fn icon_links(&self) -> &[IconLink] {
        &self.icon_links
    }
}
