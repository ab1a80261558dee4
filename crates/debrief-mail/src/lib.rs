//! debrief-mail
//!
//! Outbound email for feedback notifications. Delivery itself is someone
//! else's job: messages are either dropped into an outbox directory for a
//! mail agent to pick up, or handed to an HTTP mail relay.

pub mod error;
pub mod outbox;
pub mod relay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// A message ready to hand to a delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// A delivery channel for [`OutgoingEmail`]s.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Reject addresses that are obviously not deliverable. Real validation is
/// left to the delivery channel.
pub(crate) fn check_recipient(to: &str) -> Result<(), MailError> {
    let valid = match to.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !to.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MailError::InvalidRecipient(to.to_string()))
    }
}
