//! Timeout enforcement.
//!
//! Image attempts and the relay's overall budget are enforced with
//! [`with_timeout`], so a stalled image host costs at most one attempt's
//! deadline. The ideas and logo requests use reqwest's own per-request
//! timeout instead.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The wrapped operation did not finish before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Run `fut` with a deadline, cancelling it when the deadline passes.
pub async fn with_timeout<F>(limit: Duration, fut: F) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| TimedOut(limit))
}
