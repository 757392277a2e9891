//! Response construction and error mapping.
//!
//! Client mistakes get short text bodies (`400`, `403`); upstream and relay
//! failures get `{"error": ...}` JSON so the page can show them.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::relay::FetchedImage;

/// Header telling the client where the image bytes came from.
pub const X_IMAGE_SOURCE: &str = "x-image-source";

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing image url")]
    MissingImageUrl,

    #[error("Invalid image domain")]
    InvalidImageDomain,

    #[error("{0}")]
    Upstream(String),

    #[error("Failed to fetch image after {attempts} attempts")]
    RelayExhausted {
        attempts: usize,
        last_error: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingImageUrl => StatusCode::BAD_REQUEST,
            AppError::InvalidImageDomain => StatusCode::FORBIDDEN,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::RelayExhausted { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::MissingImageUrl | AppError::InvalidImageDomain => {
                (status, self.to_string()).into_response()
            }
            AppError::RelayExhausted {
                attempts,
                ref last_error,
            } => (
                status,
                Json(json!({
                    "error": self.to_string(),
                    "attempts": attempts,
                    "detail": last_error,
                })),
            )
                .into_response(),
            AppError::Upstream(_) | AppError::Internal(_) => {
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            }
        }
    }
}

/// Relay a fetched image with caching headers.
pub fn image_response(image: FetchedImage, cache_control: &str, source: &'static str) -> Response {
    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let cache_control = HeaderValue::from_str(cache_control)
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));
    let length = image.bytes.len();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, cache_control),
            (header::CONTENT_LENGTH, HeaderValue::from(length)),
            (
                header::HeaderName::from_static(X_IMAGE_SOURCE),
                HeaderValue::from_static(source),
            ),
        ],
        Body::from(image.bytes),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Bytes};

    #[tokio::test]
    async fn client_errors_are_plain_text() {
        let response = AppError::InvalidImageDomain.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Invalid image domain");
    }

    #[tokio::test]
    async fn exhausted_relay_is_json() {
        let response = AppError::RelayExhausted {
            attempts: 3,
            last_error: Some("timed out".into()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["attempts"], 3);
        assert_eq!(json["detail"], "timed out");
    }

    #[test]
    fn image_headers() {
        let image = FetchedImage {
            bytes: Bytes::from_static(b"GIF89a"),
            content_type: "image/gif".into(),
            cache_control: None,
        };
        let response = image_response(image, "public, max-age=60", "upstream");
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/gif");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=60");
        assert_eq!(headers[header::CONTENT_LENGTH], "6");
        assert_eq!(headers[X_IMAGE_SOURCE], "upstream");
    }
}
