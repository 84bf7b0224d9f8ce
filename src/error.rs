// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Google exchange was rejected or yielded no usable profile.
    #[error("identity provider error: {0}")]
    AuthProvider(String),

    /// The exchanged profile is missing a required field.
    #[error("provider profile incomplete: missing {0}")]
    ProfileIncomplete(&'static str),

    /// Catch-all for unexpected failures while resolving a login.
    #[error("failed to log viewer in: {0}")]
    LoginFailed(#[source] Box<AppError>),

    /// Catch-all for unexpected failures while logging out.
    #[error("failed to log viewer out: {0}")]
    LogoutFailed(#[source] Box<AppError>),

    /// The caller's cookie/token pair did not authorize the operation.
    #[error("viewer is not authorized")]
    NotAuthorized,

    /// Stripe exchange was rejected or returned no wallet id.
    #[error("payment provider error: {0}")]
    PaymentProvider(String),

    /// A store update found no document where one was expected.
    #[error("store update returned no user: {0}")]
    StoreUpdate(&'static str),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap an unexpected `logIn` failure, leaving the expected branch
    /// failures (`AuthProvider`, `ProfileIncomplete`) untouched so callers
    /// keep seeing them as distinct variants.
    pub fn into_login_failure(self) -> AppError {
        match self {
            err @ (AppError::AuthProvider(_) | AppError::ProfileIncomplete(_)) => err,
            other => AppError::LoginFailed(Box::new(other)),
        }
    }
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
            AppError::AuthProvider(msg) => (
                StatusCode::BAD_GATEWAY,
                "auth_provider_error",
                Some(msg.clone()),
            ),
            AppError::ProfileIncomplete(field) => (
                StatusCode::BAD_GATEWAY,
                "profile_incomplete",
                Some(format!("missing {}", field)),
            ),
            AppError::LoginFailed(cause) => {
                tracing::error!(error = %cause, "Login failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "login_failed",
                    Some(cause.to_string()),
                )
            }
            AppError::LogoutFailed(cause) => {
                tracing::error!(error = %cause, "Logout failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "logout_failed",
                    Some(cause.to_string()),
                )
            }
            AppError::NotAuthorized => (StatusCode::UNAUTHORIZED, "not_authorized", None),
            AppError::PaymentProvider(msg) => (
                StatusCode::BAD_GATEWAY,
                "payment_provider_error",
                Some(msg.clone()),
            ),
            AppError::StoreUpdate(msg) => {
                tracing::error!(error = %msg, "Store update returned no user");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_update_error",
                    Some(msg.to_string()),
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
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
