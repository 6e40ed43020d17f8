//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::AuthError;

/// Error body: `{"error": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
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

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Internal failures carry their detail only into the logs; the client sees a
/// fixed message.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_internal() {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, "Request rejected");
        }

        match err {
            AuthError::Validation(message) => Self::bad_request(message),
            AuthError::DuplicateEmail => Self::bad_request("email already registered"),
            AuthError::InvalidCredentials => Self::unauthorized("invalid credentials"),
            AuthError::Hashing(_) => Self::internal("password hashing failed"),
            AuthError::Store(_) => Self::internal("database error"),
            AuthError::TokenIssuance(_) => Self::internal("token generation failed"),
            AuthError::MissingToken => Self::unauthorized("missing token"),
            AuthError::InvalidToken => Self::unauthorized("invalid token"),
            AuthError::UserNotFound => Self::not_found("user not found"),
        }
    }
}
