//! Account and verification code records.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::code::CodeGenerator;
use crate::password::PasswordHash;
use crate::types::{AccountId, DisplayName, Email};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Identifier assigned at creation.
    pub id: AccountId,
    /// Display name.
    pub name: DisplayName,
    /// Normalised email address, unique across accounts.
    pub email: Email,
    /// Salted password hash.
    pub password: PasswordHash,
    /// Whether ownership of `email` has been proven.
    pub verified: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, unverified account with a fresh identifier.
    #[must_use]
    pub fn new(name: DisplayName, email: Email, password: PasswordHash) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::generate(),
            name,
            email,
            password,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip the verification flag.
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.verified = true;
        self.updated_at = at;
    }
}

/// The single active verification code of an unverified account.
///
/// Only the SHA-256 digest of the code is kept; the plaintext exists just long
/// enough to be delivered.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode {
    /// Owning account.
    pub account_id: AccountId,
    /// Hex SHA-256 digest of the 6-digit code.
    pub code_hash: String,
    /// When the code was issued.
    pub issued_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Issue a new code for `account_id`.
    ///
    /// Returns the record to store and the plaintext code to deliver.
    #[must_use]
    pub fn issue(account_id: AccountId, generator: &dyn CodeGenerator) -> (Self, String) {
        let code = generator.generate();
        let record = Self {
            account_id,
            code_hash: hash_code(&code),
            issued_at: Utc::now(),
        };
        (record, code)
    }

    /// Compare a submitted code against this one, in constant time.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        hash_code(submitted)
            .as_bytes()
            .ct_eq(self.code_hash.as_bytes())
            .into()
    }
}

/// SHA-256 hex digest of a verification code.
#[must_use]
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationCode")
            .field("account_id", &self.account_id)
            .field("issued_at", &self.issued_at)
            .finish_non_exhaustive()
    }
}
