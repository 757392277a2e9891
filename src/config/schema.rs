//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the ideas relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Upstream endpoints (ideas API, logo).
    pub upstream: UpstreamConfig,

    /// Image proxy allow-list and fallback strategy.
    pub image_proxy: ImageProxyConfig,

    /// Banner served by `/api/banner`.
    pub banner: BannerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Third-party endpoints the relay forwards to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Ideas listing endpoint; the incoming query string is appended verbatim.
    pub ideas_url: String,

    /// Site logo re-served by `/api/logo-proxy`.
    pub logo_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            ideas_url: "https://suitmedia-backend.suitdev.com/api/ideas".to_string(),
            logo_url: "https://suitmedia.com/_ipx/w_100&f_webp&q_100/assets/img/site-logo.png"
                .to_string(),
        }
    }
}

/// Image proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ImageProxyConfig {
    /// URL prefixes a target must start with (e.g. "https://assets.suitdev.com/").
    pub allowed_prefixes: Vec<String>,

    /// Hosts accepted on any path (case-insensitive exact match).
    pub allowed_hosts: Vec<String>,

    /// Alternate locations tried after the original URL.
    pub rewrites: Vec<RewriteRule>,

    /// Header disguises, tried in order for every candidate URL.
    pub disguises: Vec<DisguiseConfig>,

    /// Upper bound on upstream attempts per request (placeholder excluded).
    pub max_attempts: usize,

    /// Deadline for a single attempt, including the body read.
    pub attempt_timeout_ms: u64,

    /// Base delay between attempts; 0 disables waiting.
    pub retry_delay_ms: u64,

    /// Image served when every attempt failed.
    pub placeholder_url: String,

    /// Cache-Control used when the upstream sends none.
    pub cache_control: String,

    /// Cache-Control for placeholder responses.
    pub placeholder_cache_control: String,
}

impl Default for ImageProxyConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: vec!["https://assets.suitdev.com/".to_string()],
            allowed_hosts: Vec::new(),
            rewrites: Vec::new(),
            disguises: default_disguises(),
            max_attempts: 6,
            attempt_timeout_ms: 5_000,
            retry_delay_ms: 0,
            placeholder_url: "https://placehold.co/400x300/e2e8f0/cbd5e0?text=No+Image"
                .to_string(),
            cache_control: "public, max-age=86400".to_string(),
            placeholder_cache_control: "public, max-age=300".to_string(),
        }
    }
}

/// Replaces a URL prefix to form an alternate candidate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

/// Request headers presented to the image host.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DisguiseConfig {
    /// Label for logs and metrics.
    pub name: String,

    pub user_agent: String,

    #[serde(default)]
    pub referer: Option<String>,

    #[serde(default = "default_accept")]
    pub accept: String,
}

fn default_accept() -> String {
    "image/*,*/*;q=0.8".to_string()
}

/// Googlebot first, then a desktop browser, then an undisguised client.
pub fn default_disguises() -> Vec<DisguiseConfig> {
    vec![
        DisguiseConfig {
            name: "googlebot".to_string(),
            user_agent: "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
                .to_string(),
            referer: Some("https://suitmedia-backend.suitdev.com/".to_string()),
            accept: default_accept(),
        },
        DisguiseConfig {
            name: "browser".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            referer: Some("https://suitmedia.com/".to_string()),
            accept: default_accept(),
        },
        DisguiseConfig {
            name: "bare".to_string(),
            user_agent: concat!("ideas-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            referer: None,
            accept: default_accept(),
        },
    ]
}

/// Static banner payload.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BannerConfig {
    pub url: String,
    pub alt: String,
    pub title: String,
    pub subtitle: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            url: "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?q=80&w=2070&auto=format&fit=crop"
                .to_string(),
            alt: "Ideas Banner".to_string(),
            title: "Ideas".to_string(),
            subtitle: "Where all our great things begin".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
        }
    }
}
