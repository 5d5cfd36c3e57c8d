//! POST /v1/accounts/:id/verify: redeem an emailed code.

use axum::extract::{Path, State};
use axum::Json;
use playgate_core::types::AccountId;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AccountResponse, VerifyRequest};
use crate::router::SharedState;

/// Handle `POST /v1/accounts/:id/verify`.
///
/// # Errors
///
/// Returns `404` for an unknown account, `410` if there is no code to redeem,
/// `400` if the code does not match, or `500` on a database error.
pub async fn verify_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .verification
        .redeem(AccountId::from_uuid(id), body.code.trim())
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}
