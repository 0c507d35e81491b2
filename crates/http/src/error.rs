//! Error handling for the catalog HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::error_body;

/// Application error types that map to HTTP responses.
///
/// Every variant renders as the standard response envelope
/// (`{status, message, http_code, error?}`) and is terminal; nothing is
/// retried past the handler boundary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound {
        message: String,
        details: Option<String>,
    },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        details: Option<String>,
    },

    #[error("invalid date format: {details}")]
    InvalidDateFormat { details: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not-found error with a bare message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: None,
        }
    }

    /// Create a not-found error carrying a detail string.
    pub fn not_found_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an invalid-request error with a bare message.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid-request error carrying a detail string.
    pub fn invalid_request_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Create a date-format error.
    pub fn invalid_date(details: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            details: details.into(),
        }
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidDateFormat { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let (message, details) = match self {
            AppError::NotFound { message, details } => (message, details),
            AppError::Conflict { message } => (message, None),
            AppError::InvalidRequest { message, details } => (message, details),
            AppError::InvalidDateFormat { details } => {
                ("Invalid date format".to_string(), Some(details))
            }
            AppError::Internal(e) => ("Internal server error".to_string(), Some(e.to_string())),
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            message = %message,
            "request error"
        );

        // Internal error details stay out of production responses.
        let details = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            None
        } else {
            details
        };

        (status, Json(error_body(&message, status, details))).into_response()
    }
}
