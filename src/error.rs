// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Two layers live here: [`ApiError`] is the tagged result of a call to the
//! remote API, and [`AppError`] is what our own handlers turn into an HTTP
//! response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message shown for transport failures. Never fatal, the user retries later.
pub const NETWORK_ERROR_MESSAGE: &str = "An error occurred. Please try again later.";

/// Category of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (connect, timeout, bad body).
    Network,
    /// 401: missing, expired, or invalid session token.
    Authentication,
    /// 403: the token is valid but lacks the required role.
    Authorization,
    /// Rejected locally before any request was sent.
    Validation,
    /// Any other non-2xx answer from the remote API.
    Remote,
}

impl ErrorKind {
    /// Stable machine-readable code used in JSON error bodies.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Network => "network_error",
            ErrorKind::Authentication => "unauthorized",
            ErrorKind::Authorization => "forbidden",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Remote => "request_failed",
        }
    }
}

/// Failed remote call: a kind plus the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Status the remote API answered with, when it answered at all.
    pub status: Option<StatusCode>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorKind::Network, NETWORK_ERROR_MESSAGE)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Map a non-2xx status to a kind. 401 and 403 get their own kinds.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = match status {
            StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
            StatusCode::FORBIDDEN => ErrorKind::Authorization,
            _ => ErrorKind::Remote,
        };
        Self {
            status: Some(status),
            ..Self::new(kind, message)
        }
    }
}

/// Result of a remote API call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Page origin error: {0}")]
    Upstream(String),

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
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Api(err) => {
                let status = match err.kind {
                    ErrorKind::Network => StatusCode::BAD_GATEWAY,
                    ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                    ErrorKind::Authorization => StatusCode::FORBIDDEN,
                    ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::Remote if err.status.is_some_and(|s| s.is_server_error()) => {
                        StatusCode::BAD_GATEWAY
                    }
                    ErrorKind::Remote => StatusCode::BAD_REQUEST,
                };
                (status, err.kind.code(), Some(err.message.clone()))
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Page origin unavailable");
                (StatusCode::BAD_GATEWAY, "upstream_error", None)
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
