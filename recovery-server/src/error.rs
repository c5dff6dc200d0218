//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recovery_core::RecoveryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    #[error("Password too short (minimum 8 characters)")]
    PasswordTooShort,

    #[error("Password too long (maximum 80 characters)")]
    PasswordTooLong,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Recovery(err) => match err {
                RecoveryError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
                RecoveryError::InvalidEmailState => (
                    StatusCode::BAD_REQUEST,
                    "A password recovery request is already pending",
                ),
                RecoveryError::InvalidToken => (StatusCode::BAD_REQUEST, "Invalid recovery token"),
                RecoveryError::TokenExpired => (StatusCode::BAD_REQUEST, "Recovery token expired"),
                RecoveryError::InvalidConfig(msg)
                | RecoveryError::Storage(msg)
                | RecoveryError::Messaging(msg)
                | RecoveryError::EventPublish(msg) => {
                    tracing::error!("Internal error: {}", msg);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            ApiError::PasswordsDoNotMatch => (StatusCode::BAD_REQUEST, "Passwords do not match"),
            ApiError::PasswordTooShort => {
                (StatusCode::BAD_REQUEST, "Password too short (minimum 8 characters)")
            }
            ApiError::PasswordTooLong => {
                (StatusCode::BAD_REQUEST, "Password too long (maximum 80 characters)")
            }
        };

        let body = json!({ "success": false, "reason": message });
        (status, axum::Json(body)).into_response()
    }
}
