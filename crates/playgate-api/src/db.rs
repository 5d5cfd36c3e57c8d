//! Database connection pool initialisation and the `PostgreSQL` account store.

use chrono::{DateTime, Utc};
use log::error;
use playgate_core::password::PasswordHash;
use playgate_core::types::{AccountId, DisplayName, Email};
use playgate_core::{Account, AccountStore, BoxFuture, StoreError, VerificationCode};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during database initialisation.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLx returned an error connecting or migrating.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// Migration error.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Create a connection pool and run pending migrations.
///
/// # Errors
///
/// Returns [`DbError`] if the pool cannot be created or migrations fail.
pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, DbError> {
    let pool = PgPool::connect(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, StoreError> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            error!("account {} has corrupt {what}: {e}", self.id);
            StoreError::Unavailable(format!("corrupt account row {}", self.id))
        };
        Ok(Account {
            id: AccountId::from_uuid(self.id),
            name: DisplayName::new(&self.name).map_err(|e| corrupt("name", &e))?,
            email: Email::parse(&self.email).map_err(|e| corrupt("email", &e))?,
            password: PasswordHash::parse(&self.password_hash)
                .map_err(|e| corrupt("password hash", &e))?,
            verified: self.verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountWithCodeRow {
    #[sqlx(flatten)]
    account: AccountRow,
    code_hash: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, verified, created_at, updated_at";

fn map_db_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::EmailTaken;
        }
    }
    error!("db: {e}");
    StoreError::Unavailable(e.to_string())
}

/// [`AccountStore`] backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Wrap an existing pool. Migrations must already have run.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountStore for PgAccountStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(async move {
            sqlx::query_as::<_, AccountRow>(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
            ))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?
            .map(AccountRow::into_account)
            .transpose()
        })
    }

    fn find_by_id(
        &self,
        id: AccountId,
    ) -> BoxFuture<'_, Result<Option<(Account, Option<VerificationCode>)>, StoreError>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, AccountWithCodeRow>(
                "SELECT a.id, a.name, a.email, a.password_hash, a.verified, a.created_at,
                        a.updated_at, c.code_hash, c.issued_at
                 FROM accounts a
                 LEFT JOIN verification_codes c ON c.account_id = a.id
                 WHERE a.id = $1",
            )
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

            let Some(row) = row else {
                return Ok(None);
            };
            let code = match (row.code_hash, row.issued_at) {
                (Some(code_hash), Some(issued_at)) => Some(VerificationCode {
                    account_id: id,
                    code_hash,
                    issued_at,
                }),
                _ => None,
            };
            Ok(Some((row.account.into_account()?, code)))
        })
    }

    fn save(&self, account: Account) -> BoxFuture<'_, Result<Account, StoreError>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(map_db_err)?;

            sqlx::query(
                "INSERT INTO accounts (id, name, email, password_hash, verified, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (id) DO UPDATE SET
                     name          = EXCLUDED.name,
                     email         = EXCLUDED.email,
                     password_hash = EXCLUDED.password_hash,
                     verified      = EXCLUDED.verified,
                     updated_at    = EXCLUDED.updated_at",
            )
            .bind(account.id.as_uuid())
            .bind(account.name.as_str())
            .bind(account.email.as_str())
            .bind(account.password.encode())
            .bind(account.verified)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

            if account.verified {
                sqlx::query("DELETE FROM verification_codes WHERE account_id = $1")
                    .bind(account.id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_err)?;
            }

            tx.commit().await.map_err(map_db_err)?;
            Ok(account)
        })
    }

    fn save_code(&self, code: VerificationCode) -> BoxFuture<'_, Result<VerificationCode, StoreError>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(map_db_err)?;

            // Lock the account row so a concurrent redemption cannot verify it
            // between this check and the insert.
            let verified = sqlx::query_scalar::<_, bool>(
                "SELECT verified FROM accounts WHERE id = $1 FOR UPDATE",
            )
            .bind(code.account_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_err)?;
            if verified != Some(false) {
                return Err(StoreError::CodeRejected);
            }

            sqlx::query(
                "INSERT INTO verification_codes (account_id, code_hash, issued_at)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (account_id) DO UPDATE SET
                     code_hash = EXCLUDED.code_hash,
                     issued_at = EXCLUDED.issued_at",
            )
            .bind(code.account_id.as_uuid())
            .bind(&code.code_hash)
            .bind(code.issued_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

            tx.commit().await.map_err(map_db_err)?;
            Ok(code)
        })
    }

    fn delete_code<'a>(&'a self, code: &'a VerificationCode) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(async move {
            let rows = sqlx::query(
                "DELETE FROM verification_codes WHERE account_id = $1 AND code_hash = $2",
            )
            .bind(code.account_id.as_uuid())
            .bind(&code.code_hash)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
            Ok(rows.rows_affected() > 0)
        })
    }

    fn redeem_code<'a>(
        &'a self,
        code: &'a VerificationCode,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(map_db_err)?;

            // Same lock order as save_code: account row first, then its code.
            let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
                .bind(code.account_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_err)?;
            if locked.is_none() {
                return Ok(None);
            }

            let deleted = sqlx::query(
                "DELETE FROM verification_codes WHERE account_id = $1 AND code_hash = $2",
            )
            .bind(code.account_id.as_uuid())
            .bind(&code.code_hash)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;
            if deleted.rows_affected() == 0 {
                return Ok(None);
            }

            let row = sqlx::query_as::<_, AccountRow>(&format!(
                "UPDATE accounts SET verified = TRUE, updated_at = now()
                 WHERE id = $1
                 RETURNING {ACCOUNT_COLUMNS}"
            ))
            .bind(code.account_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_err)?;

            tx.commit().await.map_err(map_db_err)?;
            row.into_account().map(Some)
        })
    }
}
