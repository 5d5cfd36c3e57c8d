//! Tunables shared by the workflow services.

use std::time::Duration;

use crate::password::DEFAULT_ITERATIONS;

/// Deadlines and hashing cost applied by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Deadline for each account store call.
    pub store_timeout: Duration,
    /// Deadline for each notifier call.
    pub delivery_timeout: Duration,
    /// PBKDF2 iteration count for new password hashes.
    pub password_iterations: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            delivery_timeout: Duration::from_secs(10),
            password_iterations: DEFAULT_ITERATIONS,
        }
    }
}
