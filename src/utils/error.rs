//! Error types and handling
//!
//! Every failure of the organisation service is expressed as an [`AppError`].
//! Outcomes of the deletion workflow that the caller must see as a response
//! (400/500 from the user profile checks) are not errors; they are returned as
//! [`DeleteOrganisationResponse`](crate::models::DeleteOrganisationResponse) values.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, e.g. a super user without email (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A query that requires at least one match found nothing (404)
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Unique constraint violation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// User profile service communication error (502)
    #[error("User profile error: {0}")]
    UserProfile(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }

    pub fn empty_result(message: impl Into<String>) -> Self {
        AppError::EmptyResult(message.into())
    }

    pub fn user_profile(message: impl Into<String>) -> Self {
        AppError::UserProfile(message.into())
    }

    /// HTTP status used when the error crosses the service boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyResult(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UserProfile(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::EmptyResult(_) => "empty_result",
            AppError::Conflict(_) => "conflict",
            AppError::UserProfile(_) => "user_profile_error",
            AppError::Database(_) => "database_error",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        if status.is_server_error() {
            error!(error = %self, error_type = error_type, "Request error");
        }

        let body = ErrorResponse::new(error_type, self.to_string());

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::EmptyResult("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    AppError::Conflict(db_err.message().to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::UserProfile("User profile request timed out".to_string())
        } else if err.is_connect() {
            AppError::UserProfile("Failed to connect to user profile service".to_string())
        } else {
            AppError::UserProfile(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(format!("JSON parsing error: {}", err))
    }
}

/// Result type alias for the service layer
pub type AppResult<T> = Result<T, AppError>;
