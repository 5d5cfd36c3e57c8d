//! API server configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use playgate_core::password::DEFAULT_ITERATIONS;
use playgate_core::ServiceSettings;
use thiserror::Error;

/// Errors during configuration loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    Missing(String),
    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {key}: '{value}'")]
    Invalid {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// API server runtime configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// TCP address to bind (e.g. `0.0.0.0:8080`).
    pub bind_addr: String,
    /// Sender address for verification emails.
    pub from_email: String,
    /// Deadline for each database call.
    pub store_timeout: Duration,
    /// Deadline for each SES call.
    pub delivery_timeout: Duration,
    /// PBKDF2 iterations for new password hashes.
    pub password_iterations: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `DATABASE_URL` or `FROM_EMAIL` is not set,
    /// or [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::Missing(key.to_owned()));
        let number = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: key.to_owned(),
                    value,
                }),
            }
        };

        let iterations = number("PASSWORD_ITERATIONS", u64::from(DEFAULT_ITERATIONS))?;
        let password_iterations = u32::try_from(iterations)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| ConfigError::Invalid {
                key: "PASSWORD_ITERATIONS".to_owned(),
                value: iterations.to_string(),
            })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            from_email: required("FROM_EMAIL")?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_owned()),
            store_timeout: Duration::from_millis(number("STORE_TIMEOUT_MS", 5_000)?),
            delivery_timeout: Duration::from_millis(number("DELIVERY_TIMEOUT_MS", 10_000)?),
            password_iterations,
        })
    }

    /// Workflow settings derived from this configuration.
    #[must_use]
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            store_timeout: self.store_timeout,
            delivery_timeout: self.delivery_timeout,
            password_iterations: self.password_iterations,
        }
    }
}
