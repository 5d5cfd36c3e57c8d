//! Account registration and email ownership verification.
//!
//! [`RegistrationService`] creates unverified accounts and emails them a
//! 6-digit code; [`VerificationService`] redeems that code and marks the
//! account verified. Storage and mail delivery are reached through the
//! [`AccountStore`] and [`Notifier`] traits.
#![warn(clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod account;
/// Verification code generation.
pub mod code;
pub mod error;
/// In-memory account store.
pub mod memory;
pub mod notifier;
pub mod password;
pub mod registration;
pub mod settings;
pub mod store;
pub mod types;
pub mod verification;

pub use account::{Account, VerificationCode};
pub use error::AccountError;
pub use notifier::{DeliveryError, Notifier};
pub use registration::RegistrationService;
pub use settings::ServiceSettings;
pub use store::{AccountStore, BoxFuture, StoreError};
pub use verification::VerificationService;
