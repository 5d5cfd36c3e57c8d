//! Out-of-band message delivery.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::store::BoxFuture;
use crate::types::Email;

/// Errors that can occur while delivering a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The mail transport or provider rejected the message.
    #[error("mail transport failed: {0}")]
    Transport(String),
    /// The provider did not answer within the deadline.
    #[error("mail delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Sends messages to an email address.
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] on transport or provider failure.
    fn send<'a>(
        &'a self,
        to: &'a Email,
        subject: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>>;
}

/// Run a delivery under a deadline.
pub(crate) async fn bounded<F>(limit: Duration, send: F) -> Result<(), DeliveryError>
where
    F: Future<Output = Result<(), DeliveryError>>,
{
    tokio::time::timeout(limit, send)
        .await
        .map_err(|_| DeliveryError::Timeout(limit))?
}
