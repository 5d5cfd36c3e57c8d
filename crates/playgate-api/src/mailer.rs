//! Verification email delivery through Amazon SES.

use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use log::{debug, error};
use playgate_core::types::Email;
use playgate_core::{BoxFuture, DeliveryError, Notifier};

/// [`Notifier`] that sends plain-text email with SES v2.
#[derive(Debug, Clone)]
pub struct SesNotifier {
    ses: aws_sdk_sesv2::Client,
    from_email: String,
}

impl SesNotifier {
    /// Create a notifier sending from `from_email`.
    pub fn new(ses: aws_sdk_sesv2::Client, from_email: impl Into<String>) -> Self {
        Self {
            ses,
            from_email: from_email.into(),
        }
    }
}

fn content(data: &str) -> Result<Content, DeliveryError> {
    Content::builder().data(data).build().map_err(|e| {
        error!("ses build error: {e}");
        DeliveryError::Transport(format!("invalid message content: {e}"))
    })
}

impl Notifier for SesNotifier {
    fn send<'a>(
        &'a self,
        to: &'a Email,
        subject: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            let message = Message::builder()
                .subject(content(subject)?)
                .body(Body::builder().text(content(body)?).build())
                .build();

            self.ses
                .send_email()
                .from_email_address(&self.from_email)
                .destination(Destination::builder().to_addresses(to.as_str()).build())
                .content(EmailContent::builder().simple(message).build())
                .send()
                .await
                .map_err(|e| {
                    error!("SES error: {e}");
                    DeliveryError::Transport(e.to_string())
                })?;

            debug!("SES accepted message '{subject}'");
            Ok(())
        })
    }
}
