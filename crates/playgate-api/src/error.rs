//! Mapping of workflow errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use playgate_core::AccountError;

use crate::models::{ErrorBody, ErrorDetail};

/// An [`AccountError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AccountError);

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// HTTP status and stable error code for this error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AccountError::DuplicateEmail => (StatusCode::CONFLICT, "duplicate_email"),
            AccountError::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_field"),
            AccountError::DeliveryFailed(_) => (StatusCode::SERVICE_UNAVAILABLE, "delivery_failed"),
            AccountError::AccountNotFound => (StatusCode::NOT_FOUND, "account_not_found"),
            AccountError::NoActiveCode => (StatusCode::GONE, "no_active_code"),
            AccountError::InvalidCode => (StatusCode::BAD_REQUEST, "invalid_code"),
            AccountError::AlreadyVerified => (StatusCode::CONFLICT, "already_verified"),
            AccountError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_unavailable"),
            AccountError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            match (&self.0, std::error::Error::source(&self.0)) {
                (AccountError::Internal(detail), _) => error!("{}: {detail}", self.0),
                (_, Some(cause)) => error!("{}: {cause}", self.0),
                (_, None) => error!("{}", self.0),
            }
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_owned(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
