//! [`PageDocument`] built from an HTML string with `scraper`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{IconLink, ImageElement, MetaTag, PageDocument};

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static BASE: LazyLock<Selector> = LazyLock::new(|| selector("base[href]"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("meta"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("link[rel][href]"));

/// Elements whose text never contributes to the body text.
const SKIPPED_TEXT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Snapshot of a parsed HTML page.
///
/// All URLs (image sources, anchor and icon hrefs) are resolved against the
/// document's `<base href>` or, failing that, the URL the page was loaded
/// from. Natural image sizes come from the `width`/`height` attributes since
/// no image bytes are decoded; undeclared sizes are 0.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    url: Url,
    origin: String,
    title: String,
    body_text: String,
    paragraphs: Vec<String>,
    meta_tags: Vec<MetaTag>,
    images: Vec<ImageElement>,
    links: Vec<String>,
    icon_links: Vec<IconLink>,
}

impl HtmlDocument {
    /// Parse `html` loaded from `url` (the final, post-redirect URL).
    pub fn parse(html: &str, url: &Url) -> Self {
        let doc = Html::parse_document(html);

        let base = doc
            .select(&BASE)
            .find_map(|el| el.value().attr("href"))
            .and_then(|href| url.join(href.trim()).ok())
            .unwrap_or_else(|| url.clone());
        let resolve = |raw: &str| -> Option<String> {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            base.join(raw).ok().map(String::from)
        };

        let title = doc
            .select(&TITLE)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        let body_text = doc.select(&BODY).next().map(visible_text).unwrap_or_default();

        let paragraphs = doc
            .select(&PARAGRAPH)
            .map(|el| el.text().collect::<String>())
            .collect();

        let meta_tags = doc
            .select(&META)
            .map(|el| {
                let attr = |name: &str| el.value().attr(name).map(str::to_string);
                MetaTag {
                    name: attr("name"),
                    property: attr("property"),
                    content: attr("content"),
                }
            })
            .collect();

        let images = doc
            .select(&IMAGE)
            .filter_map(|el| {
                let src = resolve(el.value().attr("src")?)?;
                Some(ImageElement::new(
                    src,
                    parse_dimension(el.value().attr("width")),
                    parse_dimension(el.value().attr("height")),
                ))
            })
            .collect();

        let links = doc
            .select(&ANCHOR)
            .filter_map(|el| resolve(el.value().attr("href")?))
            .collect();

        let icon_links = doc
            .select(&LINK)
            .filter_map(|el| {
                let rel = el.value().attr("rel")?.trim();
                let href = resolve(el.value().attr("href")?)?;
                Some(IconLink::new(rel, href))
            })
            .collect();

        Self {
            url: url.clone(),
            origin: url.origin().ascii_serialization(),
            title,
            body_text,
            paragraphs,
            meta_tags,
            images,
            links,
            icon_links,
        }
    }

    /// URL the document was loaded from.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl PageDocument for HtmlDocument {
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

/// Concatenated text of `root`, skipping script-like subtrees.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_TEXT_TAGS.contains(&el.name()))
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading-digits parse of a `width`/`height` attribute (`"800"`, `"800px"`, `"640.5"`).
fn parse_dimension(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    let digits: String = value
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
