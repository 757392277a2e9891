//! `GET /api/ideas`: query-string pass-through to the upstream ideas API.

use std::time::{Duration, Instant};

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::header::ACCEPT;

use crate::http::response::AppError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Append the raw query string to the upstream URL, untouched.
pub fn upstream_url(base: &str, query: Option<&str>) -> String {
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{base}?{q}"),
        None => base.to_string(),
    }
}

pub async fn list_ideas(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let config = state.config();
    let url = upstream_url(&config.upstream.ideas_url, query.as_deref());

    tracing::debug!(url = %url, "Forwarding ideas request");

    let result = forward(&state.client, &url, state.upstream_budget()).await;
    let status = match &result {
        Ok(response) => response.status().as_u16(),
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request("ideas", status, start);
    result
}

async fn forward(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<Response, AppError> {
    let upstream = client
        .get(url)
        .header(ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Ideas API unreachable");
            AppError::Upstream(format!("Ideas API unreachable: {e}"))
        })?;

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = upstream.json().await.map_err(|e| {
        tracing::warn!(url = %url, status = %status, error = %e, "Ideas API returned invalid JSON");
        AppError::Upstream(format!("Ideas API returned invalid JSON: {e}"))
    })?;

    Ok((status, Json(body)).into_response())
}
