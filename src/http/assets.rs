//! Static and derived assets: banner JSON, site logo, service status.

use std::time::{Duration, Instant};

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::config::BannerConfig;
use crate::http::response::{image_response, AppError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::FetchedImage;

/// Logo responses are cached for an hour regardless of upstream headers.
pub const LOGO_CACHE_CONTROL: &str = "public, max-age=3600";

pub async fn get_banner(State(state): State<AppState>) -> Json<BannerConfig> {
    Json(state.config().banner.clone())
}

pub async fn get_logo(State(state): State<AppState>) -> Result<Response, AppError> {
    let start = Instant::now();
    let config = state.config();
    let url = &config.upstream.logo_url;

    let result = fetch_logo(&state.client, url, state.upstream_budget()).await;

    let response = match result {
        Ok(image) => Ok(image_response(image, LOGO_CACHE_CONTROL, "upstream")),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Logo relay failed");
            Err(e)
        }
    };
    let status = match &response {
        Ok(r) => r.status().as_u16(),
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request("logo-proxy", status, start);
    response
}

async fn fetch_logo(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedImage, AppError> {
    let upstream = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Logo fetch failed: {e}")))?;
    if !upstream.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Logo fetch failed: upstream returned {}",
            upstream.status()
        )));
    }

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(format!("Logo fetch failed: {e}")))?;

    Ok(FetchedImage {
        bytes,
        content_type,
        cache_control: None,
    })
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_status() -> impl IntoResponse {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

