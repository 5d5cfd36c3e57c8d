//! playgate account API library.
#![warn(clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod config;
pub mod db;
/// Error-to-response mapping.
pub mod error;
pub mod handlers;
/// SES-backed notifier.
pub mod mailer;
pub mod models;
pub mod router;
