//! Account registration and verification code issuance.

use std::sync::Arc;

use log::{error, info, warn};

use crate::account::{Account, VerificationCode};
use crate::code::{CodeGenerator, RandomCodeGenerator};
use crate::error::AccountError;
use crate::notifier::{self, Notifier};
use crate::password::PasswordHash;
use crate::settings::ServiceSettings;
use crate::store::{self, AccountStore};
use crate::types::{DisplayName, Email, Password};

/// Subject line of the verification email.
pub const VERIFICATION_SUBJECT: &str = "Your playgate verification code";

/// Creates accounts and issues their verification codes.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    codes: Arc<dyn CodeGenerator>,
    settings: ServiceSettings,
}

impl RegistrationService {
    /// Create a service that draws codes from [`RandomCodeGenerator`].
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            codes: Arc::new(RandomCodeGenerator),
            settings,
        }
    }

    /// Replace the code generator.
    #[must_use]
    pub fn with_code_generator(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    /// Register a new, unverified account and email it a verification code.
    ///
    /// The email is checked for uniqueness before the name and password are
    /// validated. If delivery fails the account and its code stay stored and
    /// a new code can be requested with [`resend`](Self::resend).
    ///
    /// # Errors
    ///
    /// - [`AccountError::Invalid`] if a field fails validation.
    /// - [`AccountError::DuplicateEmail`] if the email is already registered.
    /// - [`AccountError::DeliveryFailed`] if the code could not be sent.
    /// - [`AccountError::Store`] on storage failure or timeout.
    /// - [`AccountError::Internal`] if the hashing task was lost.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: String,
    ) -> Result<Account, AccountError> {
        let email = Email::parse(email)?;
        let existing = store::bounded(self.settings.store_timeout, self.store.find_by_email(&email)).await?;
        if existing.is_some() {
            warn!("registration rejected: email already registered");
            return Err(AccountError::DuplicateEmail);
        }

        let name = DisplayName::new(name)?;
        let password = Password::new(password)?;
        let iterations = self.settings.password_iterations;
        let hash = tokio::task::spawn_blocking(move || PasswordHash::derive(&password, iterations))
            .await
            .map_err(|e| {
                error!("password hashing task failed: {e}");
                AccountError::Internal(e.to_string())
            })?;

        // A concurrent registration can still win between the lookup and this
        // write; the store's unique constraint turns that into DuplicateEmail.
        let account = store::bounded(
            self.settings.store_timeout,
            self.store.save(Account::new(name, email, hash)),
        )
        .await?;
        info!("account {} registered", account.id);

        self.issue_and_deliver(&account).await?;
        Ok(account)
    }

    /// Issue a fresh code for an unverified account, superseding the old one,
    /// and email it.
    ///
    /// # Errors
    ///
    /// - [`AccountError::Invalid`] if the email is malformed.
    /// - [`AccountError::AccountNotFound`] if no account uses this email.
    /// - [`AccountError::AlreadyVerified`] if the account is already verified.
    /// - [`AccountError::DeliveryFailed`] if the code could not be sent.
    /// - [`AccountError::Store`] on storage failure or timeout.
    pub async fn resend(&self, email: &str) -> Result<Account, AccountError> {
        let email = Email::parse(email)?;
        let account = store::bounded(self.settings.store_timeout, self.store.find_by_email(&email))
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        if account.verified {
            return Err(AccountError::AlreadyVerified);
        }

        self.issue_and_deliver(&account).await?;
        Ok(account)
    }

    async fn issue_and_deliver(&self, account: &Account) -> Result<(), AccountError> {
        let (code, plaintext) = VerificationCode::issue(account.id, self.codes.as_ref());
        store::bounded(self.settings.store_timeout, self.store.save_code(code)).await?;

        let body = format!(
            "Hello {},\n\nYour verification code is: {plaintext}\n",
            account.name
        );
        notifier::bounded(
            self.settings.delivery_timeout,
            self.notifier.send(&account.email, VERIFICATION_SUBJECT, &body),
        )
        .await
        .map_err(|e| {
            error!("verification code delivery for account {} failed: {e}", account.id);
            AccountError::DeliveryFailed(e)
        })?;

        info!("verification code sent for account {}", account.id);
        Ok(())
    }
}
