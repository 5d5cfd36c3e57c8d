//! In-memory [`AccountStore`], used by tests and local development.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::account::{Account, VerificationCode};
use crate::store::{AccountStore, BoxFuture, StoreError};
use crate::types::{AccountId, Email};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    codes: HashMap<AccountId, VerificationCode>,
}

/// Process-local account store guarded by a single lock.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    tables: Mutex<Tables>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn account_count(&self) -> usize {
        self.tables.lock().await.accounts.len()
    }

    /// Number of accounts registered with `email`.
    pub async fn count_by_email(&self, email: &Email) -> usize {
        self.tables
            .lock()
            .await
            .accounts
            .values()
            .filter(|a| &a.email == email)
            .count()
    }
}

impl AccountStore for MemoryAccountStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(async move {
            let tables = self.tables.lock().await;
            Ok(tables.accounts.values().find(|a| &a.email == email).cloned())
        })
    }

    fn find_by_id(
        &self,
        id: AccountId,
    ) -> BoxFuture<'_, Result<Option<(Account, Option<VerificationCode>)>, StoreError>> {
        Box::pin(async move {
            let tables = self.tables.lock().await;
            Ok(tables
                .accounts
                .get(&id)
                .map(|a| (a.clone(), tables.codes.get(&id).cloned())))
        })
    }

    fn save(&self, account: Account) -> BoxFuture<'_, Result<Account, StoreError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let taken = tables
                .accounts
                .values()
                .any(|a| a.email == account.email && a.id != account.id);
            if taken {
                return Err(StoreError::EmailTaken);
            }
            if account.verified {
                tables.codes.remove(&account.id);
            }
            tables.accounts.insert(account.id, account.clone());
            Ok(account)
        })
    }

    fn save_code(&self, code: VerificationCode) -> BoxFuture<'_, Result<VerificationCode, StoreError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let open = tables
                .accounts
                .get(&code.account_id)
                .is_some_and(|a| !a.verified);
            if !open {
                return Err(StoreError::CodeRejected);
            }
            tables.codes.insert(code.account_id, code.clone());
            Ok(code)
        })
    }

    fn delete_code<'a>(&'a self, code: &'a VerificationCode) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let is_active = tables
                .codes
                .get(&code.account_id)
                .is_some_and(|active| active.code_hash == code.code_hash);
            if is_active {
                tables.codes.remove(&code.account_id);
            }
            Ok(is_active)
        })
    }

    fn redeem_code<'a>(
        &'a self,
        code: &'a VerificationCode,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let is_active = tables
                .codes
                .get(&code.account_id)
                .is_some_and(|active| active.code_hash == code.code_hash);
            if !is_active {
                return Ok(None);
            }
            let Some(account) = tables.accounts.get_mut(&code.account_id) else {
                return Ok(None);
            };
            account.mark_verified(Utc::now());
            let verified = account.clone();
            tables.codes.remove(&code.account_id);
            Ok(Some(verified))
        })
    }
}
