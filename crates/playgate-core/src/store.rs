//! Account store trait.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::account::{Account, VerificationCode};
use crate::types::{AccountId, Email};

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors reported by an [`AccountStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another account already uses this email address.
    #[error("email address is already registered")]
    EmailTaken,
    /// A code was saved for an account that is missing or already verified.
    #[error("account is missing or already verified")]
    CodeRejected,
    /// The operation did not finish within its deadline.
    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),
    /// Any other backend failure.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for accounts and their verification codes.
pub trait AccountStore: Send + Sync {
    /// Look up an account by normalised email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn find_by_email<'a>(
        &'a self,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>>;

    /// Load an account together with its active verification code, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn find_by_id(
        &self,
        id: AccountId,
    ) -> BoxFuture<'_, Result<Option<(Account, Option<VerificationCode>)>, StoreError>>;

    /// Insert or update an account, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmailTaken`] if another account has the same email.
    fn save(&self, account: Account) -> BoxFuture<'_, Result<Account, StoreError>>;

    /// Store `code` as the account's only active code, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CodeRejected`] if the account does not exist or is
    /// already verified.
    fn save_code(&self, code: VerificationCode) -> BoxFuture<'_, Result<VerificationCode, StoreError>>;

    /// Delete `code`, but only if it is still the account's active code.
    ///
    /// Returns `true` if this call removed it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn delete_code<'a>(&'a self, code: &'a VerificationCode) -> BoxFuture<'a, Result<bool, StoreError>>;

    /// Consume `code` and mark its account verified, as one unit.
    ///
    /// Returns `None` when `code` is no longer the active code, i.e. a
    /// concurrent redemption already consumed it or it was superseded. On
    /// error the code and the account are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    fn redeem_code<'a>(
        &'a self,
        code: &'a VerificationCode,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>>;
}

/// Run a store operation under a deadline.
pub(crate) async fn bounded<T, F>(limit: Duration, op: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, op)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
