//! POST /v1/accounts and POST /v1/accounts/verification-code: registration
//! and code re-issue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::ApiError;
use crate::models::{AccountResponse, RegisterRequest, ResendRequest};
use crate::router::SharedState;

/// Handle `POST /v1/accounts`: create an unverified account and email it a code.
///
/// # Errors
///
/// Returns `422` on invalid fields, `409` if the email is taken, `503` if the
/// code could not be emailed (the account is still created), or `500` on a
/// database error.
pub async fn register_handler(
    State(state): State<SharedState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let account = state
        .registration
        .register(&body.name, &body.email, body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// Handle `POST /v1/accounts/verification-code`: email a fresh code.
///
/// # Errors
///
/// Returns `404` for an unknown email, `409` if already verified, `503` if the
/// code could not be emailed, or `500` on a database error.
pub async fn resend_handler(
    State(state): State<SharedState>,
    Json(body): Json<ResendRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let account = state.registration.resend(&body.email).await?;
    Ok((StatusCode::ACCEPTED, Json(AccountResponse::from(&account))))
}
