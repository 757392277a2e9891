//! The fallback loop: walk the plan, stop at the first image, otherwise
//! fall back to the placeholder.

use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use crate::observability::metrics;
use crate::relay::attempt::Attempt;
use crate::relay::fetcher::{FetchedImage, ImageFetcher, RelayError};
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::timeouts::with_timeout;

/// Cap on the delay between two attempts.
const MAX_RETRY_DELAY_MS: u64 = 2_000;

/// How a relay run ended.
#[derive(Debug)]
pub enum RelayOutcome {
    /// An attempt from the plan produced an image.
    Upstream {
        image: FetchedImage,
        url: Url,
        disguise: String,
        /// 1-based position in the plan.
        attempt: usize,
    },
    /// Every attempt failed; the placeholder was fetched instead.
    Placeholder { image: FetchedImage, attempts: usize },
    /// Every attempt failed and so did the placeholder.
    Exhausted {
        attempts: usize,
        last_error: Option<String>,
    },
}

/// Runs attempt plans sequentially against an [`ImageFetcher`].
#[derive(Debug, Clone)]
pub struct ImageRelay<F> {
    fetcher: F,
    retry_delay_ms: u64,
    budget: Option<Budget>,
}

/// Overall time allowed for one run.
#[derive(Debug, Clone, Copy)]
struct Budget {
    total: Duration,
    placeholder_reserve: Duration,
}

impl<F: ImageFetcher> ImageRelay<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            retry_delay_ms: 0,
            budget: None,
        }
    }

    /// Wait between attempts, doubling each time. Zero disables waiting.
    pub fn with_retry_delay(mut self, base_ms: u64) -> Self {
        self.retry_delay_ms = base_ms;
        self
    }

    /// Bound the whole run by `total`. The plan stops early enough to leave
    /// `placeholder_reserve` (at most half of `total`) for the placeholder.
    pub fn with_budget(mut self, total: Duration, placeholder_reserve: Duration) -> Self {
        self.budget = Some(Budget {
            total,
            placeholder_reserve: placeholder_reserve.min(total / 2),
        });
        self
    }

    pub async fn run(&self, plan: &[Attempt], placeholder: Option<&Attempt>) -> RelayOutcome {
        let started = Instant::now();
        let (plan_until, run_until) = match self.budget {
            Some(budget) => {
                let run_until = started + budget.total;
                let reserve = if placeholder.is_some() {
                    budget.placeholder_reserve
                } else {
                    Duration::ZERO
                };
                (Some(run_until - reserve), Some(run_until))
            }
            None => (None, None),
        };

        let mut last_error = None;
        let mut attempts = 0;

        for (index, attempt) in plan.iter().enumerate() {
            if index > 0 {
                let delay = calculate_backoff(index as u32, self.retry_delay_ms, MAX_RETRY_DELAY_MS);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            if plan_until.is_some_and(|until| Instant::now() >= until) {
                tracing::warn!(
                    attempts,
                    remaining = plan.len() - index,
                    "Relay deadline reached, skipping remaining attempts"
                );
                break;
            }
            attempts += 1;

            match self.fetch_until(attempt, plan_until).await {
                Ok(image) => {
                    metrics::record_image_attempt(&attempt.disguise.name, "ok");
                    tracing::debug!(
                        url = %attempt.url,
                        disguise = %attempt.disguise.name,
                        attempt = index + 1,
                        bytes = image.bytes.len(),
                        "Image fetched"
                    );
                    return RelayOutcome::Upstream {
                        image,
                        url: attempt.url.clone(),
                        disguise: attempt.disguise.name.clone(),
                        attempt: index + 1,
                    };
                }
                Err(e) => {
                    metrics::record_image_attempt(&attempt.disguise.name, e.kind());
                    tracing::debug!(
                        url = %attempt.url,
                        disguise = %attempt.disguise.name,
                        attempt = index + 1,
                        error = %e,
                        "Image attempt failed"
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        tracing::warn!(
            attempts,
            last_error = last_error.as_deref().unwrap_or("none"),
            "All image attempts failed, serving placeholder"
        );

        if let Some(placeholder) = placeholder {
            match self.fetch_until(placeholder, run_until).await {
                Ok(image) => return RelayOutcome::Placeholder { image, attempts },
                Err(e) => {
                    tracing::error!(url = %placeholder.url, error = %e, "Placeholder fetch failed");
                    last_error = Some(format!("placeholder: {e}"));
                }
            }
        }

        RelayOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    async fn fetch_until(
        &self,
        attempt: &Attempt,
        until: Option<Instant>,
    ) -> Result<FetchedImage, RelayError> {
        match until {
            Some(until) => {
                let left = until.saturating_duration_since(Instant::now());
                with_timeout(left, self.fetcher.fetch(attempt)).await?
            }
            None => self.fetcher.fetch(attempt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageProxyConfig;
    use crate::relay::attempt::{build_plan, placeholder_attempt};
    use axum::body::Bytes;
    use std::sync::Mutex;

    /// Succeeds only for attempts accepted by `accept`, recording every call.
    /// Refused attempts hang for `stall` first.
    struct ScriptedFetcher {
        accept: fn(&Attempt) -> bool,
        stall: Duration,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(accept: fn(&Attempt) -> bool) -> Self {
            Self {
                accept,
                stall: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn stalling(mut self, stall: Duration) -> Self {
            self.stall = stall;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ImageFetcher for &ScriptedFetcher {
        async fn fetch(&self, attempt: &Attempt) -> Result<FetchedImage, RelayError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}@{}", attempt.disguise.name, attempt.url.host_str().unwrap_or("")));
            if (self.accept)(attempt) {
                Ok(FetchedImage {
                    bytes: Bytes::from_static(b"\x89PNG"),
                    content_type: "image/png".into(),
                    cache_control: None,
                })
            } else {
                if !self.stall.is_zero() {
                    tokio::time::sleep(self.stall).await;
                }
                Err(RelayError::Status(403))
            }
        }
    }

    fn plan() -> (Vec<Attempt>, Attempt) {
        let config = ImageProxyConfig::default();
        let target = Url::parse("https://assets.suitdev.com/a.png").unwrap();
        (
            build_plan(&target, &config),
            placeholder_attempt(&config).unwrap(),
        )
    }

    #[tokio::test]
    async fn stops_at_first_success() {
        let fetcher = ScriptedFetcher::new(|a| a.disguise.name == "browser");
        let (plan, placeholder) = plan();

        let outcome = ImageRelay::new(&fetcher).run(&plan, Some(&placeholder)).await;

        match outcome {
            RelayOutcome::Upstream { attempt, disguise, image, .. } => {
                assert_eq!(attempt, 2);
                assert_eq!(disguise, "browser");
                assert_eq!(&image.bytes[..], b"\x89PNG");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            fetcher.calls(),
            ["googlebot@assets.suitdev.com", "browser@assets.suitdev.com"]
        );
    }

    #[tokio::test]
    async fn falls_back_to_placeholder() {
        let fetcher = ScriptedFetcher::new(|a| a.disguise.name == "placeholder");
        let (plan, placeholder) = plan();

        let outcome = ImageRelay::new(&fetcher).run(&plan, Some(&placeholder)).await;

        assert!(matches!(outcome, RelayOutcome::Placeholder { attempts: 3, .. }));
        assert_eq!(fetcher.calls().len(), 4);
        assert_eq!(fetcher.calls()[3], "placeholder@placehold.co");
    }

    #[tokio::test]
    async fn exhausted_when_placeholder_fails_too() {
        let fetcher = ScriptedFetcher::new(|_| false);
        let (plan, placeholder) = plan();

        let outcome = ImageRelay::new(&fetcher).run(&plan, Some(&placeholder)).await;

        match outcome {
            RelayOutcome::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    last_error.as_deref(),
                    Some("placeholder: upstream returned status 403")
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_plan_goes_straight_to_placeholder() {
        let fetcher = ScriptedFetcher::new(|_| true);
        let (_, placeholder) = plan();

        let outcome = ImageRelay::new(&fetcher).run(&[], Some(&placeholder)).await;

        assert!(matches!(outcome, RelayOutcome::Placeholder { attempts: 0, .. }));
    }

    #[tokio::test]
    async fn budget_leaves_room_for_placeholder() {
        let fetcher = ScriptedFetcher::new(|a| a.disguise.name == "placeholder")
            .stalling(Duration::from_secs(10));
        let (plan, placeholder) = plan();

        let started = std::time::Instant::now();
        let outcome = ImageRelay::new(&fetcher)
            .with_budget(Duration::from_millis(400), Duration::from_millis(150))
            .run(&plan, Some(&placeholder))
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(outcome, RelayOutcome::Placeholder { attempts: 1, .. }));
        assert_eq!(
            fetcher.calls(),
            ["googlebot@assets.suitdev.com", "placeholder@placehold.co"]
        );
    }

    #[tokio::test]
    async fn budget_bounds_placeholder_too() {
        let fetcher = ScriptedFetcher::new(|_| false).stalling(Duration::from_secs(10));
        let (plan, placeholder) = plan();

        let started = std::time::Instant::now();
        let outcome = ImageRelay::new(&fetcher)
            .with_budget(Duration::from_millis(300), Duration::from_millis(100))
            .run(&plan, Some(&placeholder))
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        match outcome {
            RelayOutcome::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 1);
                assert!(last_error.unwrap().starts_with("placeholder: timed out"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
