//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before the response is built; clients only ever see a generic body
//! for them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::SessionError;
use crate::services::{AuthError, OrderError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order lifecycle operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller's identity does not match the resource.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session: {err}"))
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => Self::BadRequest(e.to_string()),
            SessionError::Store(e) => e.into(),
        }
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Order(err) => match err {
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::EmptyUsername | AuthError::EmptyPassword => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if status.is_server_error() => "Internal server error".to_string(),
            Self::Order(OrderError::NotFound(_)) | Self::NotFound(_) => "Not found".to_string(),
            Self::Order(OrderError::Validation(err)) => err.to_string(),
            Self::Auth(_) => "Invalid credentials".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with a staff member.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
