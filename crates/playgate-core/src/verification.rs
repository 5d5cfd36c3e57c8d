//! Verification code redemption.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::account::Account;
use crate::error::AccountError;
use crate::settings::ServiceSettings;
use crate::store::{self, AccountStore};
use crate::types::AccountId;

/// Redeems verification codes and marks accounts verified.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn AccountStore>,
    settings: ServiceSettings,
}

impl VerificationService {
    /// Create a new service over `store`.
    pub fn new(store: Arc<dyn AccountStore>, settings: ServiceSettings) -> Self {
        Self { store, settings }
    }

    /// Redeem `submitted` against the code stored for `account_id`.
    ///
    /// A wrong code leaves the stored one in place. Of two concurrent correct
    /// submissions only one succeeds; the other gets
    /// [`AccountError::NoActiveCode`].
    ///
    /// # Errors
    ///
    /// - [`AccountError::AccountNotFound`] if the account does not exist.
    /// - [`AccountError::NoActiveCode`] if there is no code left to redeem.
    /// - [`AccountError::InvalidCode`] if the code does not match.
    /// - [`AccountError::Store`] on storage failure or timeout.
    pub async fn redeem(&self, account_id: AccountId, submitted: &str) -> Result<Account, AccountError> {
        let (account, code) = store::bounded(self.settings.store_timeout, self.store.find_by_id(account_id))
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        let code = match code {
            Some(code) if !account.verified => code,
            _ => {
                debug!("account {account_id} has no active verification code");
                return Err(AccountError::NoActiveCode);
            }
        };

        if !code.matches(submitted) {
            warn!("wrong verification code submitted for account {account_id}");
            return Err(AccountError::InvalidCode);
        }

        let verified = store::bounded(self.settings.store_timeout, self.store.redeem_code(&code))
            .await?
            .ok_or(AccountError::NoActiveCode)?;
        info!("account {account_id} verified");
        Ok(verified)
    }
}
