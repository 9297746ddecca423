//! Navigation guards shared by every network-backed provider.

use std::net::IpAddr;

use tracing::warn;
use url::Url;

use linkpeek_shared::{LinkpeekError, Result};

/// Reject anything a provider must not navigate to: non-HTTP(S) schemes
/// (invalid input) and, unless allowed, private or loopback hosts.
pub(crate) fn check_target(url: &Url, allow_private_hosts: bool) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LinkpeekError::invalid_url(
            url.as_str(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !allow_private_hosts && is_ssrf_target(url) {
        warn!(%url, "SSRF protection: blocked");
        return Err(LinkpeekError::Navigation(format!(
            "{url}: private or loopback targets are not allowed"
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// SSRF protection
// ---------------------------------------------------------------------------

/// Check if a URL targets a potentially dangerous resource.
pub(crate) fn is_ssrf_target(url: &Url) -> bool {
    match url.scheme() {
        "http" | "https" => {}
        _ => return true,
    }

    match url.host() {
        Some(url::Host::Ipv4(v4)) => is_private_ip(&IpAddr::V4(v4)),
        Some(url::Host::Ipv6(v6)) => is_private_ip(&IpAddr::V6(v6)),
        Some(url::Host::Domain(host)) => {
            host == "localhost" || host.ends_with(".local") || host.ends_with(".internal")
        }
        None => true,
    }
}

/// Check if an IP is in a private/reserved range.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // 100.64.0.0/10 (Carrier-grade NAT)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
        }
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

// ---------------------------------------------------------------------------
// Redirects
// ---------------------------------------------------------------------------

/// Outcome for one redirect hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RedirectVerdict {
    Follow,
    TooMany,
    Blocked,
}

/// Decide whether to follow a redirect to `next`.
///
/// `visited` counts the URLs already requested, the initial one included, so
/// the first redirect arrives with `visited == 1`.
pub(crate) fn redirect_verdict(
    visited: usize,
    next: &Url,
    max_redirects: usize,
    allow_private_hosts: bool,
) -> RedirectVerdict {
    if visited > max_redirects {
        RedirectVerdict::TooMany
    } else if !allow_private_hosts && is_ssrf_target(next) {
        RedirectVerdict::Blocked
    } else {
        RedirectVerdict::Follow
    }
}
