//! Attempt planning for the image relay.
//!
//! A plan is the cross product of candidate URLs and header disguises,
//! candidate-major: every disguise is tried against the original URL before
//! the first rewritten URL is touched.

use url::Url;

use crate::config::{DisguiseConfig, ImageProxyConfig, RewriteRule};
use crate::security::allow_list::normalize_prefix;

/// One upstream request: where to go and which headers to wear.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub url: Url,
    pub disguise: DisguiseConfig,
}

/// The original target followed by every applicable rewrite, without duplicates.
pub fn candidate_urls(target: &Url, rewrites: &[RewriteRule]) -> Vec<Url> {
    let mut candidates = vec![target.clone()];
    for rule in rewrites {
        let from = normalize_prefix(&rule.from);
        let Some(rest) = target.as_str().strip_prefix(from.as_str()) else {
            continue;
        };
        match Url::parse(&format!("{}{}", rule.to, rest)) {
            Ok(url) if !candidates.contains(&url) => candidates.push(url),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(rule.to = %rule.to, error = %e, "Rewrite produced an invalid URL");
            }
        }
    }
    candidates
}

/// Build the ordered attempt list for `target`, capped at `max_attempts`.
pub fn build_plan(target: &Url, config: &ImageProxyConfig) -> Vec<Attempt> {
    candidate_urls(target, &config.rewrites)
        .into_iter()
        .flat_map(|url| {
            config.disguises.iter().map(move |disguise| Attempt {
                url: url.clone(),
                disguise: disguise.clone(),
            })
        })
        .take(config.max_attempts)
        .collect()
}

/// The request used to fetch the placeholder image, if its URL parses.
pub fn placeholder_attempt(config: &ImageProxyConfig) -> Option<Attempt> {
    let url = Url::parse(&config.placeholder_url).ok()?;
    Some(Attempt {
        url,
        disguise: DisguiseConfig {
            name: "placeholder".to_string(),
            user_agent: concat!("ideas-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            referer: None,
            accept: "image/*,*/*;q=0.8".to_string(),
        },
    })
}
