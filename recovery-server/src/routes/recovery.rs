//! Password recovery endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::messaging::MessageSender;
use crate::state::AppState;
use crate::store::{RecoveryRequestStore, UserStore};

/// Minimum password length
const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length
const MAX_PASSWORD_LENGTH: usize = 80;

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Deserialize)]
pub struct RestorePasswordRequest {
    pub email: String,
    pub lang: Option<String>,
}

/// POST /password/restore
/// Send a recovery token to the account's email address
pub async fn restore_password<U, R, M>(
    State(state): State<Arc<AppState<U, R, M>>>,
    Json(req): Json<RestorePasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
{
    let language = req.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    state
        .recovery
        .send_password_recovery_email_to(&req.email, language)?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// POST /password/update
/// Consume a recovery token and set a new password
pub async fn update_password<U, R, M>(
    State(state): State<Arc<AppState<U, R, M>>>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
{
    if req.password != req.confirm_password {
        return Err(ApiError::PasswordsDoNotMatch);
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::PasswordTooShort);
    }
    if req.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::PasswordTooLong);
    }

    state
        .recovery
        .update_password_using_token(&req.token, &req.password)?;

    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Deserialize)]
pub struct RecoveryStatusQuery {
    pub email: String,
}

#[derive(Serialize)]
pub struct RecoveryStatusResponse {
    pub status: String, // "complete" or "pending"
}

/// GET /password/recovery_status
/// Check whether a recovery request is outstanding for an email
pub async fn recovery_status<U, R, M>(
    State(state): State<Arc<AppState<U, R, M>>>,
    Query(query): Query<RecoveryStatusQuery>,
) -> Result<Json<RecoveryStatusResponse>, ApiError>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
{
    let pending = state.recovery.recovery_status(&query.email)?;

    Ok(Json(RecoveryStatusResponse {
        status: if pending {
            "pending".to_string()
        } else {
            "complete".to_string()
        },
    }))
}
