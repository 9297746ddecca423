//! HTTP page provider backed by `reqwest`.
//!
//! Fetches a page, follows a bounded number of redirects, and parses the body
//! into an [`HtmlDocument`] rooted at the final URL.

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::{debug, instrument};
use url::Url;

use linkpeek_extractor::HtmlDocument;
use linkpeek_shared::{FetchConfig, LinkpeekError, Result};

use crate::guard::{RedirectVerdict, check_target, redirect_verdict};
use crate::provider::PageProvider;

/// Default User-Agent string for page requests.
const USER_AGENT: &str = concat!("linkpeek/", env!("CARGO_PKG_VERSION"));

/// Loads pages over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpPageProvider {
    client: Client,
    /// Allow localhost/private IPs (integration tests, intranet deployments).
    allow_private_hosts: bool,
}

impl HttpPageProvider {
    /// Create a provider with the given fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let allow_private_hosts = config.allow_private_hosts;
        let max_redirects = config.max_redirects;

        let redirect_policy = Policy::custom(move |attempt| {
            let visited = attempt.previous().len();
            match redirect_verdict(visited, attempt.url(), max_redirects, allow_private_hosts) {
                RedirectVerdict::Follow => attempt.follow(),
                RedirectVerdict::TooMany => attempt.error("too many redirects"),
                RedirectVerdict::Blocked => attempt.error("redirect to a blocked target"),
            }
        });

        let client = Client::builder()
            .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .redirect(redirect_policy)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LinkpeekError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            allow_private_hosts,
        })
    }
}

impl PageProvider for HttpPageProvider {
    type Document = HtmlDocument;

    #[instrument(skip_all, fields(url = %url))]
    async fn open(&self, url: &Url) -> Result<HtmlDocument> {
        check_target(url, self.allow_private_hosts)?;

        debug!("fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LinkpeekError::Navigation(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkpeekError::Navigation(format!("{url}: HTTP {status}")));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| LinkpeekError::Navigation(format!("{url}: body read failed: {e}")))?;

        let doc = HtmlDocument::parse(&body, &final_url);
        if doc.url() != url {
            debug!(final_url = %doc.url(), "redirected");
        }
        debug!(bytes = body.len(), "page loaded");

        Ok(doc)
    }

    fn name(&self) -> &str {
        "http"
    }
}
