use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inkpost_auth::{messages, AuthError};
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// The cause stays in the logs; the client only sees the fixed message.
    pub fn unexpected(cause: &dyn std::fmt::Debug) -> Self {
        error!(error = ?cause, "unexpected error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, messages::UNEXPECTED_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let status = match &error {
            AuthError::Validation(_) | AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AuthError::WrongCredentials
            | AuthError::NotLoggedIn
            | AuthError::UserGone
            | AuthError::SudoOnly => StatusCode::UNAUTHORIZED,
            AuthError::Token(_) | AuthError::PasswordHash(_) | AuthError::Database(_) => {
                return Self::unexpected(&error);
            }
        };
        Self::new(status, error.to_string())
    }
}

/// Missing content type, broken syntax or the wrong JSON shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "rejected request body");
        Self::bad_request(messages::MALFORMED_BODY)
    }
}
