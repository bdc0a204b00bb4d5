//! Contact form relay service

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::domain::contact::{ContactEmail, ContactMessage, LOGO_CONTENT_ID};
use crate::domain::mail::{InlineImage, MailTransport, MailboxAddress, OutgoingEmail};
use crate::domain::DomainError;

/// Contact form submission as received from the client
#[derive(Debug, Clone, Default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Forwards contact form submissions to the operator inbox
pub struct ContactService {
    transport: Arc<dyn MailTransport>,
    inbox: Option<String>,
    logo: Option<InlineImage>,
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService")
            .field("transport", &self.transport.name())
            .field("inbox", &self.inbox)
            .field("logo", &self.logo)
            .finish()
    }
}

impl ContactService {
    /// Create a new contact service
    ///
    /// `inbox` is the fixed recipient of every submission. `logo_path`, when
    /// set, is embedded in the message as `cid:logo`.
    pub fn new(
        transport: Arc<dyn MailTransport>,
        inbox: Option<String>,
        logo_path: Option<PathBuf>,
    ) -> Self {
        let logo = logo_path.map(|path| InlineImage {
            content_id: LOGO_CONTENT_ID.to_string(),
            path,
            content_type: "image/png".to_string(),
        });

        Self {
            transport,
            inbox,
            logo,
        }
    }

    /// Validate and relay a submission
    ///
    /// Validation failures never reach the transport. A valid submission
    /// results in exactly one delivery attempt.
    pub async fn send(&self, request: ContactRequest) -> Result<(), DomainError> {
        let message = ContactMessage::new(
            request.name.as_deref(),
            request.email.as_deref(),
            request.message.as_deref(),
        )
        .map_err(|e| DomainError::validation(e.to_string()))?;

        let Some(inbox) = self.inbox.clone() else {
            return Err(DomainError::delivery("No operator inbox configured"));
        };

        let rendered = ContactEmail::render(&message)
            .map_err(|e| DomainError::internal(format!("Failed to render contact email: {}", e)))?;

        let email = OutgoingEmail {
            to: inbox,
            reply_to: Some(MailboxAddress::new(
                Some(message.name().to_string()),
                message.email(),
            )),
            subject: rendered.subject,
            html: rendered.html,
            text: ContactEmail::plain_text(&message),
            inline_images: self.logo.iter().cloned().collect(),
        };

        match self.transport.send(email).await {
            Ok(()) => {
                info!(transport = self.transport.name(), "Contact email sent");
                Ok(())
            }
            Err(e) => {
                error!(transport = self.transport.name(), error = %e, "Contact email delivery failed");
                Err(e)
            }
        }
    }
}
