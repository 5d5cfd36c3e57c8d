//! Salted PBKDF2-SHA256 password hashes.
//!
//! A [`PasswordHash`] can only be produced from a raw [`Password`] by
//! [`PasswordHash::derive`] or read back from storage with
//! [`PasswordHash::parse`]. Persisting an account therefore never re-hashes
//! an already hashed credential.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::types::Password;

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;

/// Errors that can occur when decoding a stored password hash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashFormatError {
    /// The encoded hash uses an unknown scheme.
    #[error("unknown password hash scheme '{0}'")]
    UnknownScheme(String),
    /// The encoded hash is not `scheme$iterations$salt$hash`.
    #[error("malformed password hash")]
    Malformed,
}

/// A salted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// An iteration count of zero is raised to one.
    #[must_use]
    pub fn derive(password: &Password, iterations: u32) -> Self {
        let iterations = iterations.max(1);
        let mut salt = vec![0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let hash = derive_key(password.expose(), &salt, iterations);
        Self {
            iterations,
            salt,
            hash,
        }
    }

    /// Check `candidate` against this hash in constant time.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let derived = derive_key(candidate.as_bytes(), &self.salt, self.iterations);
        derived.as_slice().ct_eq(self.hash.as_slice()).into()
    }

    /// Iteration count this hash was derived with.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Encode as `pbkdf2-sha256$<iterations>$<salt hex>$<hash hex>` for storage.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(&self.salt),
            hex::encode(&self.hash)
        )
    }

    /// Decode a hash previously produced by [`PasswordHash::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`HashFormatError`] if the scheme is unknown or any segment is invalid.
    pub fn parse(encoded: &str) -> Result<Self, HashFormatError> {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(HashFormatError::Malformed);
        };

        if scheme != SCHEME {
            return Err(HashFormatError::UnknownScheme(scheme.to_owned()));
        }
        let iterations: u32 = iterations.parse().map_err(|_| HashFormatError::Malformed)?;
        if iterations == 0 {
            return Err(HashFormatError::Malformed);
        }
        let salt = hex::decode(salt).map_err(|_| HashFormatError::Malformed)?;
        let hash = hex::decode(hash).map_err(|_| HashFormatError::Malformed)?;
        if salt.is_empty() || hash.len() != OUTPUT_LEN {
            return Err(HashFormatError::Malformed);
        }

        Ok(Self {
            iterations,
            salt,
            hash,
        })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash({SCHEME}, iterations={})", self.iterations)
    }
}

fn derive_key(secret: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut out = vec![0u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations, &mut out);
    out
}
