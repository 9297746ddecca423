//! Headless-browser page provider backed by `chromiumoxide`.
//!
//! Each request launches a fresh Chrome, navigates at a 1280x800 viewport,
//! lets late-loading images settle, and reads one DOM snapshot back through
//! `Runtime.evaluate`. Image sizes in the snapshot are the decoded natural
//! sizes, and every URL is already resolved by the browser.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use linkpeek_extractor::{MemoryDocument, MetaTag};
use linkpeek_shared::{FetchConfig, LinkpeekError, Result};

use crate::guard::{check_target, is_ssrf_target};
use crate::provider::PageProvider;

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 800;

/// Collects everything the extractor reads, as a JSON string.
const SNAPSHOT_SCRIPT: &str = r#"(() => {
  const nav = performance.getEntriesByType("navigation")[0];
  return JSON.stringify({
    url: location.href,
    origin: location.origin,
    redirectCount: nav ? nav.redirectCount : 0,
    title: document.title,
    bodyText: document.body ? document.body.innerText : "",
    paragraphs: Array.from(document.querySelectorAll("p"), (p) => p.textContent),
    metas: Array.from(document.querySelectorAll("meta"), (m) => ({
      name: m.getAttribute("name"),
      property: m.getAttribute("property"),
      content: m.getAttribute("content"),
    })),
    images: Array.from(document.querySelectorAll("img[src]"))
      .filter((img) => img.getAttribute("src").trim() !== "")
      .map((img) => ({
        src: img.src,
        naturalWidth: img.naturalWidth,
        naturalHeight: img.naturalHeight,
      })),
    links: Array.from(document.querySelectorAll("a[href]"), (a) => a.href),
    iconLinks: Array.from(document.querySelectorAll("link[rel][href]"), (l) => ({
      rel: l.getAttribute("rel").trim(),
      href: l.href,
    })),
  });
})()"#;

/// Loads pages by rendering them in headless Chrome.
#[derive(Debug, Clone)]
pub struct ChromePageProvider {
    chrome_executable: Option<PathBuf>,
    user_agent: Option<String>,
    timeout: Duration,
    settle: Duration,
    max_redirects: usize,
    allow_private_hosts: bool,
}

impl ChromePageProvider {
    /// Create a provider with the given fetch configuration.
    ///
    /// No browser is started here; each [`PageProvider::open`] launches its
    /// own instance and shuts it down before returning.
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            chrome_executable: config.chrome_executable.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
            max_redirects: config.max_redirects,
            allow_private_hosts: config.allow_private_hosts,
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .viewport(Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                ..Viewport::default()
            })
            .request_timeout(self.timeout);

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.arg(format!("--user-agent={user_agent}"));
        }

        // Fails here when no executable is configured and none is installed.
        builder.build().map_err(|e| {
            LinkpeekError::config(format!(
                "cannot start browser ({e}); set [fetch] chrome_executable or use backend = \"http\""
            ))
        })
    }

    /// Navigate an already running browser to `url` and take the snapshot.
    async fn render(&self, browser: &Browser, url: &Url) -> Result<DomSnapshot> {
        let navigation = |e: chromiumoxide::error::CdpError| {
            LinkpeekError::Navigation(format!("{url}: {e}"))
        };

        let page = browser.new_page("about:blank").await.map_err(navigation)?;
        page.goto(url.as_str()).await.map_err(navigation)?;
        page.wait_for_navigation().await.map_err(navigation)?;

        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let raw: String = page
            .evaluate(SNAPSHOT_SCRIPT)
            .await
            .map_err(navigation)?
            .into_value()
            .map_err(|e| LinkpeekError::Navigation(format!("{url}: unreadable snapshot: {e}")))?;

        if let Err(e) = page.close().await {
            trace!(error = %e, "page close failed");
        }

        DomSnapshot::from_json(&raw)
            .map_err(|e| LinkpeekError::Navigation(format!("{url}: unreadable snapshot: {e}")))
    }

    /// Apply the redirect rules to where the browser actually ended up.
    fn check_landing(&self, url: &Url, snapshot: &DomSnapshot) -> Result<()> {
        if snapshot.redirect_count > self.max_redirects {
            return Err(LinkpeekError::Navigation(format!(
                "{url}: too many redirects ({})",
                snapshot.redirect_count
            )));
        }

        if self.allow_private_hosts {
            return Ok(());
        }
        match Url::parse(&snapshot.url) {
            Ok(landed) if !is_ssrf_target(&landed) => Ok(()),
            _ => {
                warn!(landed = %snapshot.url, "SSRF protection: redirect blocked");
                Err(LinkpeekError::Navigation(format!(
                    "{url}: redirect to a blocked target"
                )))
            }
        }
    }
}

impl PageProvider for ChromePageProvider {
    type Document = MemoryDocument;

    #[instrument(skip_all, fields(url = %url))]
    async fn open(&self, url: &Url) -> Result<MemoryDocument> {
        check_target(url, self.allow_private_hosts)?;

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| LinkpeekError::Navigation(format!("failed to launch browser: {e}")))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!(error = %e, "browser connection closed");
                    break;
                }
            }
        });

        debug!("rendering page");
        let rendered = tokio::time::timeout(self.timeout, self.render(&browser, url)).await;

        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        if let Err(e) = browser.wait().await {
            debug!(error = %e, "browser process did not exit cleanly");
        }
        if let Err(e) = events.await {
            debug!(error = %e, "browser event task failed");
        }

        let snapshot = rendered.map_err(|_| {
            LinkpeekError::Navigation(format!(
                "{url}: timed out after {}s",
                self.timeout.as_secs()
            ))
        })??;

        self.check_landing(url, &snapshot)?;
        if snapshot.url != url.as_str() {
            debug!(final_url = %snapshot.url, "redirected");
        }
        debug!(images = snapshot.images.len(), "page rendered");

        Ok(snapshot.into_document())
    }

    fn name(&self) -> &str {
        "browser"
    }
}

// ---------------------------------------------------------------------------
// DOM snapshot
// ---------------------------------------------------------------------------

/// Page state as reported by the snapshot script.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DomSnapshot {
    url: String,
    origin: String,
    redirect_count: usize,
    title: String,
    body_text: String,
    paragraphs: Vec<String>,
    metas: Vec<SnapshotMeta>,
    images: Vec<SnapshotImage>,
    links: Vec<String>,
    icon_links: Vec<SnapshotIconLink>,
}

#[derive(Debug, Deserialize)]
struct SnapshotMeta {
    name: Option<String>,
    property: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotImage {
    src: String,
    natural_width: u32,
    natural_height: u32,
}

#[derive(Debug, Deserialize)]
struct SnapshotIconLink {
    rel: String,
    href: String,
}

impl DomSnapshot {
    fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    fn into_document(self) -> MemoryDocument {
        let doc = MemoryDocument::new(self.origin)
            .with_title(self.title)
            .with_body_text(self.body_text);

        let doc = self
            .paragraphs
            .into_iter()
            .fold(doc, |doc, text| doc.with_paragraph(text));
        let doc = self.metas.into_iter().fold(doc, |doc, meta| {
            doc.with_meta_tag(MetaTag {
                name: meta.name,
                property: meta.property,
                content: meta.content,
            })
        });
        let doc = self.images.into_iter().fold(doc, |doc, img| {
            doc.with_image(img.src, img.natural_width, img.natural_height)
        });
        let doc = self.links.into_iter().fold(doc, |doc, href| doc.with_link(href));
        self.icon_links
            .into_iter()
            .fold(doc, |doc, link| doc.with_icon_link(link.rel, link.href))
    }
}
