//! Single-attempt image fetching.

use std::future::Future;
use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName};
use thiserror::Error;

use crate::relay::attempt::Attempt;
use crate::resilience::timeouts::{with_timeout, TimedOut};

/// Content type assumed when the image host does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Why one attempt did not produce an image.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Timeout(#[from] TimedOut),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream returned non-image content type '{0}'")]
    NotAnImage(String),
}

impl RelayError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Timeout(_) => "timeout",
            RelayError::Transport(_) => "transport",
            RelayError::Status(_) => "status",
            RelayError::NotAnImage(_) => "not_image",
        }
    }
}

/// A successfully fetched image, fully buffered.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Bytes,
    pub content_type: String,
    pub cache_control: Option<String>,
}

/// Performs one attempt.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, attempt: &Attempt)
        -> impl Future<Output = Result<FetchedImage, RelayError>> + Send;
}

/// [`ImageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    attempt_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, attempt_timeout: Duration) -> Self {
        Self {
            client,
            attempt_timeout,
        }
    }

    async fn fetch_once(&self, attempt: &Attempt) -> Result<FetchedImage, RelayError> {
        let disguise = &attempt.disguise;
        let mut request = self
            .client
            .get(attempt.url.clone())
            .header(header::ACCEPT, disguise.accept.as_str())
            .header(header::USER_AGENT, disguise.user_agent.as_str());
        if let Some(referer) = &disguise.referer {
            request = request.header(header::REFERER, referer.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        let content_type = header_string(response.headers(), header::CONTENT_TYPE);
        if let Some(ct) = &content_type {
            if !is_image(ct) {
                return Err(RelayError::NotAnImage(ct.clone()));
            }
        }
        let cache_control = header_string(response.headers(), header::CACHE_CONTROL);
        let bytes = response.bytes().await?;

        Ok(FetchedImage {
            bytes,
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            cache_control,
        })
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, attempt: &Attempt) -> Result<FetchedImage, RelayError> {
        // the deadline covers the body read as well as the headers
        with_timeout(self.attempt_timeout, self.fetch_once(attempt)).await?
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True for `image/*` media types, ignoring case and parameters.
pub fn is_image(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .unwrap_or(false)
}
