//! Errors returned by the registration and verification workflow.

use thiserror::Error;

use crate::notifier::DeliveryError;
use crate::store::StoreError;
use crate::types::ValidationError;

/// Errors returned by [`RegistrationService`](crate::registration::RegistrationService)
/// and [`VerificationService`](crate::verification::VerificationService).
#[derive(Debug, Error)]
pub enum AccountError {
    /// An account with this email address already exists.
    #[error("this email address is already registered")]
    DuplicateEmail,
    /// A submitted field is invalid.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The account was stored but the verification code could not be sent.
    #[error("verification code could not be delivered, request a new code later")]
    DeliveryFailed(#[source] DeliveryError),
    /// No account has the given identifier or email.
    #[error("account not found")]
    AccountNotFound,
    /// The account has no code to redeem (already verified or consumed).
    #[error("no active verification code for this account")]
    NoActiveCode,
    /// The submitted code does not match the active one.
    #[error("verification code does not match")]
    InvalidCode,
    /// A new code was requested for an account that is already verified.
    #[error("account is already verified")]
    AlreadyVerified,
    /// The account store failed.
    #[error("storage unavailable")]
    Store(#[source] StoreError),
    /// A background task (password hashing) did not complete.
    #[error("internal error")]
    Internal(String),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmailTaken => Self::DuplicateEmail,
            StoreError::CodeRejected => Self::AlreadyVerified,
            other => Self::Store(other),
        }
    }
}
