//! Request and response types for the account endpoints.

use chrono::{DateTime, Utc};
use playgate_core::Account;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for `POST /v1/accounts`.
#[derive(Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address to verify.
    pub email: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
}

/// Request body for `POST /v1/accounts/:id/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// 6-digit code received by email.
    pub code: String,
}

/// Request body for `POST /v1/accounts/verification-code`.
#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    /// Email address of the unverified account.
    pub email: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Account UUID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Normalised email address.
    pub email: String,
    /// Whether the email address has been verified.
    pub verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.as_uuid(),
            name: account.name.to_string(),
            email: account.email.to_string(),
            verified: account.verified,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Machine-readable code plus human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code, e.g. `duplicate_email`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}
