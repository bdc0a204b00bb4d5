//! SMTP mail transport backed by lettre

use std::fmt::Debug;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

use crate::domain::mail::{InlineImage, MailTransport, MailboxAddress, OutgoingEmail};
use crate::domain::DomainError;

/// Connection settings for an authenticated SMTP relay
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Display name shown alongside the relay account in `From`
    pub from_name: String,
}

impl Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .field("from_name", &self.from_name)
            .finish()
    }
}

/// Mail transport that relays through an SMTP server over TLS
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("sender", &self.sender.to_string())
            .finish()
    }
}

impl SmtpMailTransport {
    /// Build a pooled transport; no connection is opened until the first send
    pub fn new(settings: SmtpSettings) -> Result<Self, DomainError> {
        let address: Address = settings.username.parse().map_err(|e| {
            DomainError::configuration(format!(
                "Invalid mail relay account '{}': {}",
                settings.username, e
            ))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| {
                DomainError::configuration(format!(
                    "Invalid SMTP relay '{}': {}",
                    settings.host, e
                ))
            })?
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            sender: Mailbox::new(Some(settings.from_name), address),
        })
    }

    async fn build_message(&self, email: OutgoingEmail) -> Result<Message, DomainError> {
        let to: Address = email
            .to
            .parse()
            .map_err(|e| DomainError::delivery(format!("Invalid recipient '{}': {}", email.to, e)))?;

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(Mailbox::new(None, to))
            .subject(email.subject);

        if let Some(reply_to) = email.reply_to.as_ref().and_then(to_mailbox) {
            builder = builder.reply_to(reply_to);
        }

        let mut related = MultiPart::related().singlepart(SinglePart::html(email.html));
        for image in &email.inline_images {
            if let Some(part) = load_inline_image(image).await? {
                related = related.singlepart(part);
            }
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(email.text))
                    .multipart(related),
            )
            .map_err(|e| DomainError::delivery(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        let message = self.build_message(email).await?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DomainError::delivery(format!("SMTP relay rejected message: {}", e)))?;

        debug!(code = %response.code(), "SMTP relay accepted message");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

fn to_mailbox(address: &MailboxAddress) -> Option<Mailbox> {
    let email: Address = address.email.parse().ok()?;
    let name = address.name.as_deref().and_then(display_name);
    Some(Mailbox::new(name, email))
}

/// Header-safe display name: control characters become spaces and runs of
/// whitespace collapse to one. Blank names are dropped.
fn display_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    (!collapsed.is_empty()).then_some(collapsed)
}

/// Read an inline image from disk
///
/// A missing file is skipped with a warning; any other read failure is a
/// delivery error.
async fn load_inline_image(image: &InlineImage) -> Result<Option<SinglePart>, DomainError> {
    let exists = tokio::fs::try_exists(&image.path).await.unwrap_or(false);
    if !exists {
        warn!(path = %image.path.display(), "Inline image not found, sending without it");
        return Ok(None);
    }

    let bytes = tokio::fs::read(&image.path).await.map_err(|e| {
        DomainError::delivery(format!(
            "Failed to read inline image '{}': {}",
            image.path.display(),
            e
        ))
    })?;

    let content_type = ContentType::parse(&image.content_type).map_err(|e| {
        DomainError::delivery(format!(
            "Invalid content type '{}': {}",
            image.content_type, e
        ))
    })?;

    Ok(Some(
        Attachment::new_inline(image.content_id.clone()).body(bytes, content_type),
    ))
}
