//! Outbound mail domain
//!
//! Message shape handed to a mail transport, and the transport trait itself.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Named mailbox used for reply-to addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxAddress {
    pub name: Option<String>,
    pub email: String,
}

impl MailboxAddress {
    pub fn new(name: Option<String>, email: impl Into<String>) -> Self {
        Self {
            name,
            email: email.into(),
        }
    }
}

/// Image embedded in the HTML body through a `cid:` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_id: String,
    pub path: PathBuf,
    pub content_type: String,
}

/// A composed email ready for delivery
///
/// The sender is not part of the message: the transport always sends from
/// its own authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<MailboxAddress>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub inline_images: Vec<InlineImage>,
}

/// Delivery channel for outbound email
///
/// A single call is a single delivery attempt; implementations do not retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver the message, returning `DomainError::Delivery` on any relay fault
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError>;

    /// Short transport name for logs
    fn name(&self) -> &'static str;
}
