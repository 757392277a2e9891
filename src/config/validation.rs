//! Configuration validation.
//!
//! Serde handles the syntactic checks; this pass checks values that parse but
//! cannot work (unparseable addresses, empty allow-lists, zero limits).
//! Every problem is collected so one run reports them all.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid http(s) URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("image_proxy: allow-list is empty, every image would be rejected")]
    EmptyAllowList,

    #[error("image_proxy: at least one disguise is required")]
    NoDisguises,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    check_url(&mut errors, "upstream.ideas_url", &config.upstream.ideas_url);
    check_url(&mut errors, "upstream.logo_url", &config.upstream.logo_url);

    let proxy = &config.image_proxy;
    check_url(&mut errors, "image_proxy.placeholder_url", &proxy.placeholder_url);
    for prefix in &proxy.allowed_prefixes {
        check_url(&mut errors, "image_proxy.allowed_prefixes", prefix);
    }
    for rule in &proxy.rewrites {
        check_url(&mut errors, "image_proxy.rewrites.to", &rule.to);
    }
    if proxy.allowed_prefixes.is_empty() && proxy.allowed_hosts.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }
    if proxy.disguises.is_empty() {
        errors.push(ValidationError::NoDisguises);
    }
    if proxy.max_attempts == 0 {
        errors.push(ValidationError::Zero("image_proxy.max_attempts"));
    }
    if proxy.attempt_timeout_ms == 0 {
        errors.push(ValidationError::Zero("image_proxy.attempt_timeout_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
