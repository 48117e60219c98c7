//! Unified error types for the freshdigest API
//!
//! This module defines error types for each layer:
//! - `UpstreamError`: classified failures of a single upstream call
//! - `AppError`: handler-layer errors mapped onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single upstream request's failure, classified.
///
/// `Timeout`, `Request`, and `Api` distinguish "upstream unreachable or
/// rejected"; `Decode` means the upstream responded but the body was
/// unusable. The split drives both the retry policy and the HTTP status
/// mapping.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("request to upstream timed out")]
    Timeout,

    #[error("request error: {0}")]
    Request(String),

    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

/// Handler-layer errors - used by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The subscription directory fetch failed; aborts the whole
    /// aggregation, unlike per-feed failures.
    #[error("subscription list fetch failed: {0}")]
    Directory(UpstreamError),

    /// A pass-through upstream call failed.
    #[error("upstream request failed: {0}")]
    Proxy(UpstreamError),

    #[error("invalid request: {0}")]
    BadRequest(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Directory(err) => {
                tracing::error!("Subscription list fetch failed: {}", err);
                match err {
                    UpstreamError::Decode(msg) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to decode JSON response",
                        Some(msg.clone()),
                    ),
                    other => (
                        StatusCode::BAD_GATEWAY,
                        "Failed to fetch subscriptions",
                        Some(other.to_string()),
                    ),
                }
            }
            AppError::Proxy(err) => {
                tracing::error!("Upstream request failed: {}", err);
                match err {
                    UpstreamError::Timeout => (
                        StatusCode::GATEWAY_TIMEOUT,
                        "Request to FreshRSS API timed out",
                        None,
                    ),
                    UpstreamError::Decode(msg) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to decode JSON response",
                        Some(msg.clone()),
                    ),
                    other => (
                        StatusCode::BAD_GATEWAY,
                        "Request error",
                        Some(other.to_string()),
                    ),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
