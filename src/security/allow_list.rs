//! Image domain allow-list.
//!
//! # Responsibilities
//! - Parse the requested target into a URL
//! - Accept only http(s) targets
//! - Match against configured URL prefixes and hosts
//!
//! # Design Decisions
//! - Host matching is case-insensitive
//! - Prefix matching compares the normalized URL text, so
//!   `https://ASSETS.suitdev.com/x` matches `https://assets.suitdev.com/`
//! - Any matcher accepting is enough (OR semantics)
//! - Redirects on the image client are re-checked hop by hop against the
//!   live config

use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::config::{AppConfig, ImageProxyConfig};

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// Why a target URL was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("target is not a valid URL")]
    Unparseable,
    #[error("scheme '{0}' is not allowed")]
    Scheme(String),
    #[error("target is not on the allow-list")]
    NotAllowed,
}

/// Trait for matching target URLs against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the URL matches this condition.
    fn matches(&self, url: &Url) -> bool;
}

/// Matches the URL host exactly.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }
}

impl Matcher for HostMatcher {
    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| h.to_lowercase() == self.expected_host)
            .unwrap_or(false)
    }
}

/// Matches a normalized URL prefix.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: normalize_prefix(prefix.as_ref()),
        }
    }
}

/// Normalize a configured URL prefix the same way targets are normalized
/// (lowercase host, `/` path for bare origins). Unparseable text is kept as is.
pub fn normalize_prefix(prefix: &str) -> String {
    Url::parse(prefix.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| prefix.to_string())
}

impl Matcher for PrefixMatcher {
    fn matches(&self, url: &Url) -> bool {
        url.as_str().starts_with(&self.prefix)
    }
}

/// Set of matchers a target must satisfy at least one of.
#[derive(Debug, Default)]
pub struct AllowList {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ImageProxyConfig) -> Self {
        let mut list = Self::new();
        for prefix in &config.allowed_prefixes {
            list.push(PrefixMatcher::new(prefix));
        }
        for host in &config.allowed_hosts {
            list.push(HostMatcher::new(host));
        }
        list
    }

    pub fn push(&mut self, matcher: impl Matcher + 'static) {
        self.matchers.push(Box::new(matcher));
    }

    /// Parse and check a raw target, returning the normalized URL.
    pub fn check(&self, raw: &str) -> Result<Url, Rejection> {
        let url = Url::parse(raw.trim()).map_err(|_| Rejection::Unparseable)?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(Rejection::Scheme(other.to_string())),
        }
        if self.matchers.iter().any(|m| m.matches(&url)) {
            Ok(url)
        } else {
            Err(Rejection::NotAllowed)
        }
    }
}

/// Redirect policy for image fetches: a hop is followed only when its
/// target passes the current allow-list. A refused hop hands the 3xx back
/// to the caller, which treats it as a failed attempt.
pub fn redirect_policy(config: Arc<ArcSwap<AppConfig>>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let verdict = AllowList::from_config(&config.load().image_proxy).check(attempt.url().as_str());
        match verdict {
            Ok(_) => attempt.follow(),
            Err(reason) => {
                tracing::warn!(to = %attempt.url(), reason = %reason, "Image redirect refused");
                attempt.stop()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_list() -> AllowList {
        AllowList::from_config(&ImageProxyConfig::default())
    }

    #[test]
    fn accepts_asset_domain() {
        let url = default_list()
            .check("https://assets.suitdev.com/storage/files/1/a.jpg")
            .unwrap();
        assert_eq!(url.host_str(), Some("assets.suitdev.com"));
    }

    #[test]
    fn host_case_is_ignored() {
        assert!(default_list().check("https://ASSETS.SuitDev.com/a.jpg").is_ok());
    }

    #[test]
    fn rejects_lookalike_host() {
        // plain string prefix check would let this through
        assert_eq!(
            default_list().check("https://assets.suitdev.com.evil.io/a.jpg"),
            Err(Rejection::NotAllowed)
        );
        assert_eq!(
            default_list().check("https://assets.suitdev.com@evil.io/a.jpg"),
            Err(Rejection::NotAllowed)
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(
            default_list().check("file:///etc/passwd"),
            Err(Rejection::Scheme("file".into()))
        );
        assert_eq!(default_list().check("not a url"), Err(Rejection::Unparseable));
    }

    #[test]
    fn host_matcher_allows_any_path() {
        let mut list = AllowList::new();
        list.push(HostMatcher::new("Images.Example.com"));
        assert!(list.check("http://images.example.com/deep/path.png").is_ok());
        assert!(list.check("http://other.example.com/deep/path.png").is_err());
    }

    #[test]
    fn prefixes_are_normalized() {
        assert_eq!(normalize_prefix("https://ASSETS.suitdev.com"), "https://assets.suitdev.com/");
        assert_eq!(normalize_prefix("not a url"), "not a url");

        let mut list = AllowList::new();
        list.push(PrefixMatcher::new("HTTPS://Assets.SuitDev.com"));
        assert!(list.check("https://assets.suitdev.com/a.jpg").is_ok());
    }

    #[test]
    fn empty_list_rejects_everything() {
        assert_eq!(
            AllowList::new().check("https://assets.suitdev.com/a.jpg"),
            Err(Rejection::NotAllowed)
        );
    }
}
