//! Validated newtype wrappers for account fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a submitted account field fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is outside the allowed length range.
    #[error("{field} must be between {min} and {max} characters (got {got})")]
    Length {
        /// Name of the offending field.
        field: &'static str,
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        got: usize,
    },
    /// The value is shorter than the minimum length.
    #[error("{field} must be at least {min} characters (got {got})")]
    TooShort {
        /// Name of the offending field.
        field: &'static str,
        /// Minimum allowed length.
        min: usize,
        /// Actual length.
        got: usize,
    },
    /// The email address does not have a `local@domain` shape.
    #[error("email address must have the form local@domain")]
    MalformedEmail,
}

const NAME_MIN: usize = 1;
const NAME_MAX: usize = 32;
const EMAIL_MIN: usize = 6;
const EMAIL_MAX: usize = 255;
const PASSWORD_MIN: usize = 6;

/// Opaque account identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Return the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A normalised email address (trimmed and lower-cased).
///
/// Uniqueness of accounts is decided on this normalised form, so
/// `Dev@Example.com` and `dev@example.com` are the same address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the address is not 6–255 characters long
    /// or does not look like `local@domain.tld`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let email = raw.trim().to_lowercase();
        let len = email.chars().count();
        if !(EMAIL_MIN..=EMAIL_MAX).contains(&len) {
            return Err(ValidationError::Length {
                field: "email",
                min: EMAIL_MIN,
                max: EMAIL_MAX,
                got: len,
            });
        }
        if !is_email_shaped(&email) {
            return Err(ValidationError::MalformedEmail);
        }
        Ok(Self(email))
    }

    /// Return the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated display name (1–32 characters after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new `DisplayName`, validating its length.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Length`] if the trimmed name is not 1–32 characters.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        let len = name.chars().count();
        if !(NAME_MIN..=NAME_MAX).contains(&len) {
            return Err(ValidationError::Length {
                field: "name",
                min: NAME_MIN,
                max: NAME_MAX,
                got: len,
            });
        }
        Ok(Self(name.to_owned()))
    }

    /// Return the inner name string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw password as submitted by the user.
///
/// Only ever turned into a [`PasswordHash`](crate::password::PasswordHash);
/// it is never stored and its `Debug` output is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Validate a submitted password.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooShort`] if it has fewer than 6 characters.
    pub fn new(raw: String) -> Result<Self, ValidationError> {
        let len = raw.chars().count();
        if len < PASSWORD_MIN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: PASSWORD_MIN,
                got: len,
            });
        }
        Ok(Self(raw))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
