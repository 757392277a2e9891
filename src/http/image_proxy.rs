//! `GET /api/image-proxy?url=<URL>`: allow-listed image relay with
//! placeholder fallback.

use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::http::response::{image_response, AppError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::{build_plan, placeholder_attempt, HttpFetcher, ImageRelay, RelayOutcome};
use crate::security::AllowList;

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let result = relay_image(&state, query).await;
    let status = match &result {
        Ok(response) => response.status().as_u16(),
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request("image-proxy", status, start);
    result
}

async fn relay_image(state: &AppState, query: ImageQuery) -> Result<Response, AppError> {
    let raw = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or(AppError::MissingImageUrl)?;

    let config = state.config();
    let proxy = &config.image_proxy;

    let target = AllowList::from_config(proxy).check(&raw).map_err(|reason| {
        tracing::warn!(url = %raw, reason = %reason, "Image target rejected");
        metrics::record_image_outcome("rejected");
        AppError::InvalidImageDomain
    })?;

    let plan = build_plan(&target, proxy);
    let placeholder = placeholder_attempt(proxy);
    let attempt_timeout = Duration::from_millis(proxy.attempt_timeout_ms);
    let fetcher = HttpFetcher::new(state.image_client.clone(), attempt_timeout);
    let relay = ImageRelay::new(fetcher)
        .with_retry_delay(proxy.retry_delay_ms)
        .with_budget(state.upstream_budget(), attempt_timeout);

    match relay.run(&plan, placeholder.as_ref()).await {
        RelayOutcome::Upstream {
            image,
            url,
            disguise,
            attempt,
        } => {
            metrics::record_image_outcome("upstream");
            tracing::info!(url = %url, disguise = %disguise, attempt, "Image relayed");
            let cache_control = image
                .cache_control
                .clone()
                .unwrap_or_else(|| proxy.cache_control.clone());
            Ok(image_response(image, &cache_control, "upstream"))
        }
        RelayOutcome::Placeholder { image, attempts } => {
            metrics::record_image_outcome("placeholder");
            tracing::info!(url = %target, attempts, "Served placeholder image");
            Ok(image_response(image, &proxy.placeholder_cache_control, "placeholder"))
        }
        RelayOutcome::Exhausted {
            attempts,
            last_error,
        } => {
            metrics::record_image_outcome("failed");
            Err(AppError::RelayExhausted {
                attempts,
                last_error,
            })
        }
    }
}
