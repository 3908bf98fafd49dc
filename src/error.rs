// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Classified failure from the RunKeeper API.
///
/// The client performs no retries; callers decide what a failure means.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("RunKeeper rejected the access token")]
    Auth,

    #[error("Network failure talking to RunKeeper: {0}")]
    Network(String),

    #[error("Unexpected RunKeeper response: {0}")]
    Unexpected(String),
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Unknown user ID: {0}")]
    UnknownUser(String),

    #[error("RunKeeper returned no usable profile")]
    MissingProfile,

    #[error("Cannot get activity ID from its URI: {0}")]
    MalformedReference(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("RunKeeper API error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::UnknownUser(id) => {
                (StatusCode::UNAUTHORIZED, "unknown_user", Some(id.clone()))
            }
            AppError::MissingProfile => (StatusCode::BAD_GATEWAY, "missing_profile", None),
            AppError::MalformedReference(uri) => (
                StatusCode::BAD_REQUEST,
                "malformed_reference",
                Some(uri.clone()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Remote(err) => (
                StatusCode::BAD_GATEWAY,
                "runkeeper_error",
                Some(err.to_string()),
            ),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
